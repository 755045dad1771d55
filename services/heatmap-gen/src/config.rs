//! Configuration loading for the heatmap generator.
//!
//! Reads an optional YAML file into [`HeatmapConfig`], expands `${VAR}` and
//! `${VAR:-default}` references, resolves relative background paths against
//! the file's directory, then applies `HEATMAP_*` overrides and validates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use heatmap_common::HeatmapConfig;
use tracing::debug;

/// Load the generator configuration.
///
/// Without a path the defaults are used; environment overrides and validation
/// apply either way.
pub fn load_config(path: Option<&Path>) -> Result<HeatmapConfig> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => HeatmapConfig::default(),
    };

    config.apply_env();
    config
        .validate()
        .context("Invalid heatmap configuration")?;

    Ok(config)
}

/// Parse a YAML configuration file without applying environment overrides.
pub fn load_config_file(path: &Path) -> Result<HeatmapConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let expanded = expand_env_vars(&content)?;

    let mut config: HeatmapConfig = serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    if let Some(base) = path.parent() {
        resolve_relative_paths(&mut config, base);
    }

    debug!(
        path = %path.display(),
        backgrounds = config.backgrounds.len(),
        "Loaded heatmap configuration"
    );

    Ok(config)
}

/// Make background and font paths relative to `base` unless already absolute.
pub fn resolve_relative_paths(config: &mut HeatmapConfig, base: &Path) {
    for path in config.backgrounds.values_mut() {
        *path = resolve(base, path);
    }
    if let Some(font) = config.font_path.as_mut() {
        *font = resolve(base, font);
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Expand `${VAR}` and `${VAR:-default}` in YAML content. Comment text, from
/// an unquoted `#` to the end of the line, is copied unchanged.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    for (i, line) in content.split_inclusive('\n').enumerate() {
        let (code, comment) = split_comment(line);
        result.push_str(
            &expand_line(code).with_context(|| format!("Invalid substitution on line {}", i + 1))?,
        );
        result.push_str(comment);
    }
    Ok(result)
}

/// Split a line at the first `#` that starts a YAML comment: outside quotes
/// and at the line start or after whitespace.
fn split_comment(line: &str) -> (&str, &str) {
    let mut quote = None;
    let mut prev = None;
    for (i, ch) in line.char_indices() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, '#') if prev.map_or(true, char::is_whitespace) => {
                return line.split_at(i);
            }
            _ => {}
        }
        prev = Some(ch);
    }
    (line, "")
}

fn expand_line(line: &str) -> Result<String> {
    let mut result = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars_with_default() {
        std::env::remove_var("HEATMAP_GEN_TEST_UNSET");
        let result = expand_env_vars("padding: ${HEATMAP_GEN_TEST_UNSET:-25}").unwrap();
        assert_eq!(result, "padding: 25");
    }

    #[test]
    fn test_expand_env_vars_set() {
        std::env::set_var("HEATMAP_GEN_TEST_PLAN", "plans/ground.png");
        let result = expand_env_vars("floor1: ${HEATMAP_GEN_TEST_PLAN}").unwrap();
        assert_eq!(result, "floor1: plans/ground.png");
    }

    #[test]
    fn test_expand_env_vars_missing_required() {
        std::env::remove_var("HEATMAP_GEN_TEST_REQUIRED");
        assert!(expand_env_vars("${HEATMAP_GEN_TEST_REQUIRED}").is_err());
    }

    #[test]
    fn test_comments_are_not_expanded() {
        std::env::remove_var("HEATMAP_GEN_TEST_COMMENTED");
        let yaml = "# uses ${HEATMAP_GEN_TEST_COMMENTED}\npadding: 10 # or ${HEATMAP_GEN_TEST_COMMENTED}\n";
        assert_eq!(expand_env_vars(yaml).unwrap(), yaml);
    }

    #[test]
    fn test_hash_inside_value_is_not_a_comment() {
        std::env::set_var("HEATMAP_GEN_TEST_FLOOR", "plan");
        let result = expand_env_vars("floor1: \"a#${HEATMAP_GEN_TEST_FLOOR}\"\nfloor2: b#${HEATMAP_GEN_TEST_FLOOR}.png\n").unwrap();
        assert_eq!(result, "floor1: \"a#plan\"\nfloor2: b#plan.png\n");
    }

    #[test]
    fn test_expand_env_vars_unclosed() {
        assert!(expand_env_vars("padding: ${PADDING").is_err());
    }

    #[test]
    fn test_resolve_relative_paths() {
        let mut config = HeatmapConfig::default();
        config
            .backgrounds
            .insert("floor1".to_string(), PathBuf::from("plans/floor1.png"));
        config
            .backgrounds
            .insert("floor2".to_string(), PathBuf::from("/srv/floor2.png"));
        config.font_path = Some(PathBuf::from("fonts/label.ttf"));

        resolve_relative_paths(&mut config, Path::new("/etc/heatmap"));

        assert_eq!(
            config.backgrounds["floor1"],
            PathBuf::from("/etc/heatmap/plans/floor1.png")
        );
        assert_eq!(config.backgrounds["floor2"], PathBuf::from("/srv/floor2.png"));
        assert_eq!(
            config.font_path,
            Some(PathBuf::from("/etc/heatmap/fonts/label.ttf"))
        );
    }
}
