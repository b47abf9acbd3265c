use scraper::ElementRef;

/// Text of an element with every fragment trimmed and empty fragments
/// dropped, concatenated without separators.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_stripped_text_joins_trimmed_fragments() {
        let html = Html::parse_fragment("<div>\n  123.<b> 45 </b>\n</div>");
        let selector = Selector::parse("div").unwrap();
        let div = html.select(&selector).next().unwrap();

        assert_eq!(stripped_text(div), "123.45");
    }

    #[test]
    fn test_stripped_text_of_whitespace_is_empty() {
        let html = Html::parse_fragment("<p>  <span>\t</span> </p>");
        let selector = Selector::parse("p").unwrap();
        let paragraph = html.select(&selector).next().unwrap();

        assert_eq!(stripped_text(paragraph), "");
    }
}
