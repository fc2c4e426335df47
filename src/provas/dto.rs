use serde::{Deserialize, Serialize};

use crate::{
    provas::ai::QuestaoGerada,
    wiki::InfoEspecialidade,
};

/// Categorias de especialidade do clube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoriaEspecialidade {
    Adra,
    ArtesEHabilidadesManuais,
    AtividadesAgricolas,
    AtividadesMissionariasEComunitarias,
    AtividadesProfissionais,
    AtividadesRecreativas,
    CienciaESaude,
    EstudosDaNatureza,
    HabilidadesDomesticas,
}

impl CategoriaEspecialidade {
    /// Nome de exibição usado nos prompts e nas respostas.
    pub fn formatar(&self) -> &'static str {
        match self {
            Self::Adra => "ADRA",
            Self::ArtesEHabilidadesManuais => "Artes e Habilidades Manuais",
            Self::AtividadesAgricolas => "Atividades Agrícolas",
            Self::AtividadesMissionariasEComunitarias => {
                "Atividades Missionárias e Comunitárias"
            }
            Self::AtividadesProfissionais => "Atividades Profissionais",
            Self::AtividadesRecreativas => "Atividades Recreativas",
            Self::CienciaESaude => "Ciência e Saúde",
            Self::EstudosDaNatureza => "Estudos da Natureza",
            Self::HabilidadesDomesticas => "Habilidades Domésticas",
        }
    }
}

/// Corpo de `POST /provas/gerar-questoes`.
#[derive(Debug, Deserialize)]
pub struct GerarQuestoesRequest {
    pub especialidade: String,
    pub categoria: CategoriaEspecialidade,
    #[serde(rename = "numeroQuestoes")]
    pub numero_questoes: u32,
    #[serde(rename = "urlReferenciaMDA", default)]
    pub url_referencia_mda: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GerarQuestoesResponse {
    pub questoes: Vec<QuestaoGerada>,
    #[serde(rename = "urlValidada")]
    pub url_validada: bool,
    #[serde(rename = "especialidadeInfo", skip_serializing_if = "Option::is_none")]
    pub especialidade_info: Option<InfoEspecialidade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categoria_desserializa_do_vocabulario_da_plataforma() {
        let c: CategoriaEspecialidade =
            serde_json::from_str("\"ARTES_E_HABILIDADES_MANUAIS\"").unwrap();
        assert_eq!(c, CategoriaEspecialidade::ArtesEHabilidadesManuais);
        assert_eq!(c.formatar(), "Artes e Habilidades Manuais");
    }

    #[test]
    fn request_aceita_campos_camel_case() {
        let req: GerarQuestoesRequest = serde_json::from_str(
            r#"{
                "especialidade": "Primeiros Socorros",
                "categoria": "CIENCIA_E_SAUDE",
                "numeroQuestoes": 10,
                "urlReferenciaMDA": "Primeiros_Socorros/"
            }"#,
        )
        .unwrap();
        assert_eq!(req.numero_questoes, 10);
        assert_eq!(req.url_referencia_mda.as_deref(), Some("Primeiros_Socorros/"));
    }
}
