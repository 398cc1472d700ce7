// src/analysis/env.rs
// =============================================================================
// Lists the environment variables a project expects, read from the text of
// its .env.example file.
//
//   # Database settings        <- comment, skipped
//   DATABASE_URL=postgres://   <- "DATABASE_URL"
//   API_KEY =                  <- "API_KEY"
//   just some text             <- no '=', skipped
// =============================================================================

/// Returns the variable names declared in a .env-style file, in file order.
/// Duplicates are kept.
pub fn extract_env_vars(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#') && trimmed.contains('=')
        })
        .filter_map(|line| line.split('=').next())
        .map(|name| name.trim().to_string())
        .collect()
}
