//! Terminal rendering for search state

use colored::Colorize;
use placefinder::{CompletionSuggestion, PlaceResult, PreviewScene, Viewport};

pub fn print_completions(fragment: &str, completions: &[CompletionSuggestion]) {
    if completions.is_empty() {
        println!("No suggestions for '{}'", fragment);
        return;
    }

    println!(
        "{} suggestions for '{}':",
        completions.len().to_string().green(),
        fragment
    );
    for completion in completions {
        println!("  {}", completion_label(completion));
    }
}

pub fn completion_label(completion: &CompletionSuggestion) -> String {
    if completion.subtitle.is_empty() {
        completion.title.cyan().to_string()
    } else {
        format!(
            "{} {}",
            completion.title.cyan(),
            truncate_string(&completion.subtitle, 60).dimmed()
        )
    }
}

pub fn print_results(query: &str, results: &[PlaceResult], viewport: Option<&Viewport>) {
    println!(
        "{} results for '{}':",
        results.len().to_string().green(),
        query
    );
    for (index, result) in results.iter().enumerate() {
        println!(
            "  {} {} {}",
            format!("{:>2}.", index + 1).dimmed(),
            result.name.cyan().bold(),
            format!("({})", result.coordinate).dimmed()
        );
    }

    if let Some(viewport) = viewport {
        println!(
            "{} center ({}) span {:.4}° x {:.4}°",
            "Viewport:".bold(),
            viewport.center,
            viewport.span.latitude_delta,
            viewport.span.longitude_delta
        );
    }
}

pub fn print_scene(scene: &PreviewScene) {
    println!("{} {}", "Preview scene:".bold(), scene.id.cyan());
    println!("  Location: {}", scene.coordinate);
    if let Some(captured_at) = scene.captured_at {
        println!("  Captured: {}", captured_at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(url) = &scene.image_url {
        println!("  Image: {}", url.underline());
    }
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_is_char_safe() {
        assert_eq!(truncate_string("Zürich", 10), "Zürich");
        assert_eq!(truncate_string("東京都港区芝公園", 3), "東京都...");
    }

    #[test]
    fn test_completion_label_without_subtitle() {
        colored::control::set_override(false);
        let label = completion_label(&CompletionSuggestion::new("Paris", ""));
        assert_eq!(label, "Paris");

        let label = completion_label(&CompletionSuggestion::new("Louvre", "Paris, France"));
        assert_eq!(label, "Louvre Paris, France");
    }
}
