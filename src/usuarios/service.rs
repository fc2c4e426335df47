use tracing::info;

use crate::{
    auth::{
        dto::MensagemResponse,
        password::{hash_senha_async, verificar_senha_async},
        repo_types::Usuario,
        service::email_valido,
    },
    error::{violacao_unicidade, ApiError},
    state::AppState,
    usuarios::dto::{
        AtualizarPerfilRequest, ListaUsuariosResponse, Paginacao, UsuarioDetalhes,
    },
};

pub async fn listar_todos(
    state: &AppState,
    pagina: i64,
    limite: i64,
) -> Result<ListaUsuariosResponse, ApiError> {
    let pagina = pagina.max(1);
    let limite = limite.clamp(1, 100);
    let offset = (pagina - 1) * limite;

    let usuarios = Usuario::listar(&state.db, limite, offset).await?;
    let total = Usuario::contar(&state.db).await?;

    Ok(ListaUsuariosResponse {
        dados: usuarios.iter().map(UsuarioDetalhes::from).collect(),
        paginacao: Paginacao {
            pagina_atual: pagina,
            itens_por_pagina: limite,
            total_itens: total,
            total_paginas: (total + limite - 1) / limite,
        },
    })
}

pub async fn buscar_por_id(state: &AppState, id: i64) -> Result<UsuarioDetalhes, ApiError> {
    let usuario = Usuario::buscar_por_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado(format!("Usuário com ID {id} não encontrado")))?;
    Ok(UsuarioDetalhes::from(&usuario))
}

/// Atualiza nome/email do próprio perfil. A troca de email exige que o
/// novo endereço esteja livre e invalida a verificação anterior.
pub async fn atualizar_perfil(
    state: &AppState,
    usuario_id: i64,
    req: AtualizarPerfilRequest,
) -> Result<UsuarioDetalhes, ApiError> {
    let usuario = Usuario::buscar_por_id(&state.db, usuario_id)
        .await?
        .ok_or_else(|| {
            ApiError::NaoEncontrado(format!("Usuário com ID {usuario_id} não encontrado"))
        })?;

    let nome = req.nome.unwrap_or_else(|| usuario.nome.clone());
    let email = req.email.unwrap_or_else(|| usuario.email.clone());
    let email_alterado = email != usuario.email;

    if email_alterado {
        if !email_valido(&email) {
            return Err(ApiError::Validacao("Email inválido".into()));
        }
        if let Some(existente) = Usuario::buscar_por_email(&state.db, &email).await? {
            if existente.id != usuario_id {
                return Err(ApiError::Conflito("Este email já está em uso".into()));
            }
        }
    }

    let atualizado =
        match Usuario::atualizar_perfil(&state.db, usuario_id, &nome, &email, email_alterado).await
        {
            Ok(u) => u,
            Err(e) if violacao_unicidade(&e) => {
                return Err(ApiError::Conflito("Este email já está em uso".into()));
            }
            Err(e) => return Err(e.into()),
        };

    info!(usuario_id, email_alterado, "perfil atualizado");
    Ok(UsuarioDetalhes::from(&atualizado))
}

/// Troca a senha do próprio usuário após conferir a senha atual.
pub async fn alterar_senha(
    state: &AppState,
    usuario_id: i64,
    senha_atual: &str,
    nova_senha: &str,
) -> Result<MensagemResponse, ApiError> {
    if nova_senha.len() < 8 {
        return Err(ApiError::Validacao(
            "Senha deve ter pelo menos 8 caracteres".into(),
        ));
    }

    let usuario = Usuario::buscar_por_id(&state.db, usuario_id)
        .await?
        .ok_or_else(|| {
            ApiError::NaoEncontrado(format!("Usuário com ID {usuario_id} não encontrado"))
        })?;

    let Some(hash) = usuario.senha_hash.as_deref() else {
        return Err(ApiError::Validacao(
            "Usuários que fazem login com Google não podem alterar senha".into(),
        ));
    };

    if !verificar_senha_async(senha_atual.to_string(), hash.to_string()).await? {
        return Err(ApiError::Autenticacao("Senha atual incorreta".into()));
    }

    let novo_hash = hash_senha_async(nova_senha.to_string()).await?;
    Usuario::atualizar_senha(&state.db, usuario_id, &novo_hash).await?;

    info!(usuario_id, "senha alterada");
    Ok(MensagemResponse::new("Senha alterada com sucesso!"))
}
