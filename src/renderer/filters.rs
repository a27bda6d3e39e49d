use log::warn;
use minijinja::Environment;
use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_CHARS: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+"));

/// Reduces a string to lowercase ASCII letters, digits and single dashes.
///
/// # Arguments
/// * `value` - The string to slugify
///
/// # Returns
/// * `String` - The slug, empty when nothing alphanumeric remains
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    match &*NON_SLUG_CHARS {
        Ok(re) => re.replace_all(&lowered, "-").trim_matches('-').to_string(),
        Err(err) => {
            warn!("Invalid slug pattern: {err}");
            lowered
        }
    }
}

/// Registers `slugify` as a filter on a twig-like environment.
pub fn register_filters(env: &mut Environment<'_>) {
    env.add_filter("slugify", slugify);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Mustache"), "mustache");
        assert_eq!(slugify("  Twig Engine 3 "), "twig-engine-3");
        assert_eq!(slugify("--a__b--"), "a-b");
    }

    #[test]
    fn slugify_empty_input() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_filter_is_registered() {
        let mut env = Environment::new();
        register_filters(&mut env);
        let out = env
            .render_str("{{ 'My Form' | slugify }}", minijinja::context! {})
            .unwrap();
        assert_eq!(out, "my-form");
    }
}
