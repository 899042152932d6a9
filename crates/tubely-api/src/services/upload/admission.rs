use tubely_core::AppError;

/// Parse the declared content type down to its essence (`type/subtype`, no params).
pub fn content_type_essence(declared: Option<&str>) -> Result<String, AppError> {
    let declared = declared
        .ok_or_else(|| AppError::BadRequest("Missing content type".to_string()))?;
    let parsed: mime::Mime = declared
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid content type: {}", declared)))?;
    Ok(parsed.essence_str().to_ascii_lowercase())
}

/// Admit a video field only when its declared type is in `allowed`.
pub fn admit_video_type(declared: Option<&str>, allowed: &[&str]) -> Result<String, AppError> {
    let essence = content_type_essence(declared)?;
    if !allowed.contains(&essence.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Invalid file type '{}'. Allowed: {}",
            essence,
            allowed.join(", ")
        )));
    }
    Ok(essence)
}

/// Admit a thumbnail field, returning its content type and key extension.
pub fn admit_thumbnail_type(
    declared: Option<&str>,
    allowed: &[(&str, &'static str)],
) -> Result<(String, &'static str), AppError> {
    let essence = content_type_essence(declared)?;
    allowed
        .iter()
        .find(|(ct, _)| *ct == essence)
        .map(|(_, ext)| (essence.clone(), *ext))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid thumbnail type '{}'. Allowed: image/png, image/jpeg",
                essence
            ))
        })
}
