//! Profile edits for the signed-in user. Each edit re-fetches the canonical
//! user record instead of patching the local copy.

use crate::{
    app_lib::MultipartFile,
    features::{
        auth::{
            flows as auth_flows,
            types::{OtpKind, non_empty},
            validate,
        },
        context::AppContext,
        outcome::{FlowOutcome, Notice, Surface, surface_error},
        users::types::ChangeMailOrUsernameRequest,
    },
    routes::Route,
};
use std::{fmt, path::Path};
use tracing::debug;

/// Largest accepted avatar upload.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

const AVATAR_STATUSES: &[u16] = &[404];
const TWO_FACTOR_STATUSES: &[u16] = &[404, 429];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarError {
    NotAnImage,
    TooLarge(usize),
}

impl fmt::Display for AvatarError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvatarError::NotAnImage => formatter.write_str("You must choose image file type"),
            AvatarError::TooLarge(_) => formatter.write_str("The file size must be less than 5 MB"),
        }
    }
}

impl std::error::Error for AvatarError {}

fn image_type_for(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())?
        .to_ascii_lowercase();
    let content_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(content_type)
}

/// Builds the avatar upload. An explicit content type wins over the one
/// guessed from the file name; either way it must be `image/*`.
///
/// # Errors
/// Returns `AvatarError` when the file is not an image or exceeds the size cap.
pub fn prepare_avatar(
    file_name: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<MultipartFile, AvatarError> {
    let content_type = content_type
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .or_else(|| image_type_for(file_name).map(str::to_string))
        .filter(|value| value.starts_with("image/"))
        .ok_or(AvatarError::NotAnImage)?;

    if bytes.len() > MAX_AVATAR_BYTES {
        return Err(AvatarError::TooLarge(bytes.len()));
    }

    Ok(MultipartFile {
        file_name: file_name.to_string(),
        content_type,
        bytes,
    })
}

pub async fn update_avatar(ctx: &AppContext, file: MultipartFile) -> FlowOutcome {
    match ctx.backend().update_avatar(file).await {
        Ok(response) if response.success => {
            ctx.auth().refresh_user(ctx.backend()).await;
            FlowOutcome::notice(Notice::success(response.message))
        }
        Ok(_) => FlowOutcome::none(),
        Err(err) => FlowOutcome {
            notice: surface_error("update_avatar", &err, Surface::Statuses(AVATAR_STATUSES)),
            navigate: None,
        },
    }
}

async fn change_mail_or_username(
    ctx: &AppContext,
    request: ChangeMailOrUsernameRequest,
    kind: OtpKind,
) -> FlowOutcome {
    match ctx.backend().change_mail_or_username(&request).await {
        Ok(response) if response.success => match non_empty(response.token) {
            Some(token) => FlowOutcome::navigate(Route::verify_otp(&token, kind))
                .with_notice(Notice::success(response.message)),
            None => FlowOutcome::none(),
        },
        Ok(_) => FlowOutcome::none(),
        Err(err) => FlowOutcome {
            notice: surface_error("change_mail_or_username", &err, Surface::Statuses(&[])),
            navigate: None,
        },
    }
}

/// Starts a username change; the new name is applied after OTP verification.
pub async fn change_username(ctx: &AppContext, username: &str) -> FlowOutcome {
    if let Err(err) = validate::username(username) {
        return FlowOutcome::notice(Notice::error(err.to_string()));
    }
    change_mail_or_username(
        ctx,
        ChangeMailOrUsernameRequest::username(username),
        OtpKind::UsernameChange,
    )
    .await
}

/// Starts an email change; the new address is applied after OTP verification.
pub async fn change_email(ctx: &AppContext, email: &str) -> FlowOutcome {
    if let Err(err) = validate::email(email) {
        return FlowOutcome::notice(Notice::error(err.to_string()));
    }
    change_mail_or_username(
        ctx,
        ChangeMailOrUsernameRequest::email(email),
        OtpKind::EmailChange,
    )
    .await
}

/// Sends a password reset link to the signed-in user. The typed address must
/// be the account's current email.
pub async fn request_password_reset(ctx: &AppContext, email: &str) -> FlowOutcome {
    if let Err(err) = validate::email(email) {
        return FlowOutcome::notice(Notice::error(err.to_string()));
    }
    let matches = ctx
        .auth()
        .user()
        .is_some_and(|user| user.email == email.trim());
    if !matches {
        return FlowOutcome::notice(Notice::error("Email incorrect!"));
    }
    auth_flows::reset_password_mail(ctx, email).await
}

/// Starts enabling two-factor login. Does nothing when it is already on.
pub async fn enable_two_factor(ctx: &AppContext) -> FlowOutcome {
    if ctx
        .auth()
        .user()
        .is_some_and(|user| user.is_two_factor_enabled)
    {
        debug!("two-factor already enabled");
        return FlowOutcome::none();
    }

    match ctx.backend().enable_two_factor().await {
        Ok(response) if response.success => match non_empty(response.token) {
            Some(token) => FlowOutcome::navigate(Route::verify_otp(&token, OtpKind::TwoFactor)),
            None => FlowOutcome::none(),
        },
        Ok(_) => FlowOutcome::none(),
        Err(err) => FlowOutcome {
            notice: surface_error(
                "enable_two_factor",
                &err,
                Surface::Statuses(TWO_FACTOR_STATUSES),
            ),
            navigate: None,
        },
    }
}
