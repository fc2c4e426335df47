use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Tipo de questão gerada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoQuestao {
    MultiplaEscolha,
    Dissertativa,
    Pratica,
}

/// Uma questão produzida pelo provedor de IA.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestaoGerada {
    pub tipo: TipoQuestao,
    pub enunciado: String,
    /// Mapa letra → alternativa, apenas para múltipla escolha.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opcoes: Option<serde_json::Value>,
    #[serde(rename = "respostaCorreta", skip_serializing_if = "Option::is_none")]
    pub resposta_correta: Option<String>,
    pub pontuacao: i32,
}

#[derive(Debug, Clone)]
pub struct ParametrosGeracao {
    pub especialidade: String,
    pub categoria: String,
    pub numero_questoes: u32,
    pub url_referencia: Option<String>,
}

/// Contrato com o serviço externo de geração de questões.
#[async_trait]
pub trait AiClient: Send + Sync {
    fn is_available(&self) -> bool;
    async fn generate_questions(
        &self,
        params: ParametrosGeracao,
    ) -> anyhow::Result<Vec<QuestaoGerada>>;
}

/// Cliente usado quando nenhuma chave de API foi configurada.
pub struct AiDesabilitado;

#[async_trait]
impl AiClient for AiDesabilitado {
    fn is_available(&self) -> bool {
        false
    }

    async fn generate_questions(
        &self,
        _params: ParametrosGeracao,
    ) -> anyhow::Result<Vec<QuestaoGerada>> {
        anyhow::bail!("serviço de IA desabilitado")
    }
}

/// Cliente de chat-completions da OpenAI. O modelo responde com um array
/// JSON de questões, desserializado direto para `QuestaoGerada`.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

const URL_CHAT_COMPLETIONS: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: "gpt-4o-mini".to_string(),
        }
    }

    fn montar_prompt(params: &ParametrosGeracao) -> String {
        let referencia = params
            .url_referencia
            .as_deref()
            .map(|u| format!(" Use como referência o conteúdo de https://mda.wiki.br/{u}."))
            .unwrap_or_default();
        format!(
            "Gere {} questões para uma prova da especialidade \"{}\" \
             (categoria: {}) do clube de desbravadores.{} \
             Responda somente com um array JSON onde cada item tem os campos \
             tipo (MULTIPLA_ESCOLHA, DISSERTATIVA ou PRATICA), enunciado, \
             opcoes (objeto letra → texto, apenas para múltipla escolha), \
             respostaCorreta e pontuacao (inteiro de 1 a 10).",
            params.numero_questoes, params.especialidade, params.categoria, referencia,
        )
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate_questions(
        &self,
        params: ParametrosGeracao,
    ) -> anyhow::Result<Vec<QuestaoGerada>> {
        let corpo = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": Self::montar_prompt(&params)}
            ],
        });

        let resp = self
            .http
            .post(URL_CHAT_COMPLETIONS)
            .bearer_auth(&self.api_key)
            .json(&corpo)
            .send()
            .await?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "provedor de IA recusou a requisição");
            anyhow::bail!("provedor de IA respondeu {}", resp.status());
        }

        let chat: ChatResponse = resp.json().await?;
        let conteudo = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default();

        // o modelo às vezes embrulha o array em um bloco de código
        let json = conteudo
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let questoes: Vec<QuestaoGerada> = serde_json::from_str(json)?;
        info!(quantidade = questoes.len(), "questões geradas pelo provedor");
        Ok(questoes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_serializa_no_vocabulario_da_plataforma() {
        assert_eq!(
            serde_json::to_string(&TipoQuestao::MultiplaEscolha).unwrap(),
            "\"MULTIPLA_ESCOLHA\""
        );
        assert_eq!(
            serde_json::from_str::<TipoQuestao>("\"PRATICA\"").unwrap(),
            TipoQuestao::Pratica
        );
    }

    #[test]
    fn questao_gerada_desserializa_do_formato_do_provedor() {
        let json = r#"{
            "tipo": "MULTIPLA_ESCOLHA",
            "enunciado": "Qual é a capital do Brasil?",
            "opcoes": {"a": "São Paulo", "b": "Brasília"},
            "respostaCorreta": "b",
            "pontuacao": 5
        }"#;
        let q: QuestaoGerada = serde_json::from_str(json).unwrap();
        assert_eq!(q.tipo, TipoQuestao::MultiplaEscolha);
        assert_eq!(q.resposta_correta.as_deref(), Some("b"));
    }

    #[test]
    fn prompt_inclui_referencia_quando_presente() {
        let params = ParametrosGeracao {
            especialidade: "Primeiros Socorros".into(),
            categoria: "Ciência e Saúde".into(),
            numero_questoes: 10,
            url_referencia: Some("Primeiros_Socorros/".into()),
        };
        let prompt = OpenAiClient::montar_prompt(&params);
        assert!(prompt.contains("10 questões"));
        assert!(prompt.contains("https://mda.wiki.br/Primeiros_Socorros/"));

        let sem_ref = ParametrosGeracao {
            url_referencia: None,
            ..params
        };
        assert!(!OpenAiClient::montar_prompt(&sem_ref).contains("mda.wiki.br"));
    }

    #[test]
    fn cliente_desabilitado_nunca_esta_disponivel() {
        assert!(!AiDesabilitado.is_available());
    }
}
