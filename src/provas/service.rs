use tracing::{info, warn};

use crate::{
    error::ApiError,
    provas::{
        ai::ParametrosGeracao,
        dto::{GerarQuestoesRequest, GerarQuestoesResponse},
    },
    state::AppState,
};

/// Gera questões para uma especialidade, validando a URL de referência do
/// MDA Wiki quando fornecida.
///
/// Uma referência que falha na validação não aborta a geração: o resultado
/// sai com `urlValidada = false` e sem metadados extraídos.
pub async fn gerar_questoes(
    state: &AppState,
    req: GerarQuestoesRequest,
) -> Result<GerarQuestoesResponse, ApiError> {
    if !state.ai.is_available() {
        return Err(ApiError::Validacao(
            "Serviço de IA não está disponível. Configure OPENAI_API_KEY no .env".into(),
        ));
    }

    if !(1..=20).contains(&req.numero_questoes) {
        return Err(ApiError::Validacao(
            "Número de questões deve estar entre 1 e 20".into(),
        ));
    }

    info!(
        especialidade = %req.especialidade,
        quantidade = req.numero_questoes,
        "gerando questões"
    );

    let mut url_validada = true;
    let mut especialidade_info = None;

    if let Some(slug) = &req.url_referencia_mda {
        let resultado = state.wiki.validar_url(slug).await?;
        if !resultado.valida {
            warn!(url = %resultado.url_completa, "URL do MDA Wiki inválida");
            url_validada = false;
        } else if let Some(validada) = &resultado.url {
            especialidade_info = state.wiki.extrair_info(validada).await;
        }
    }

    let questoes = state
        .ai
        .generate_questions(ParametrosGeracao {
            especialidade: req.especialidade.clone(),
            categoria: req.categoria.formatar().to_string(),
            numero_questoes: req.numero_questoes,
            url_referencia: req.url_referencia_mda.clone(),
        })
        .await
        .map_err(ApiError::Interno)?;

    info!(quantidade = questoes.len(), "questões geradas com sucesso");

    Ok(GerarQuestoesResponse {
        questoes,
        url_validada,
        especialidade_info,
    })
}
