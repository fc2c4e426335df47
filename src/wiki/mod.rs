mod validator;

pub use validator::{InfoEspecialidade, ResultadoValidacao, UrlWikiValidada, WikiValidator};
