/// Split concatenated slide content into raw slide strings.
///
/// A slide break is a line of three or more dashes with a blank line (or the
/// start/end of the input) on both sides. Dash lines inside fenced code
/// blocks never break. Empty chunks are dropped, so consecutive breaks
/// collapse into one.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut slides: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<(char, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some((fence_char, fence_len)) = fence {
            if closes_fence(trimmed, fence_char, fence_len) {
                fence = None;
            }
            current.push(line);
            continue;
        }

        if let Some(opened) = opens_fence(trimmed) {
            fence = Some(opened);
            current.push(line);
            continue;
        }

        if is_dash_separator(trimmed) {
            let prev_blank = i == 0 || lines[i - 1].trim().is_empty();
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                flush(&mut current, &mut slides);
                continue;
            }
        }

        current.push(line);
    }
    flush(&mut current, &mut slides);

    slides
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    if !text.is_empty() {
        slides.push(text);
    }
    current.clear();
}

pub(crate) fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then_some((first, len))
}

pub(crate) fn closes_fence(trimmed: &str, fence_char: char, fence_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == fence_char).count();
    count >= fence_len && trimmed.chars().skip(count).all(char::is_whitespace)
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_separator() {
        let slides = split("Slide one\n\n---\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_dash_without_blank_lines_is_content() {
        let slides = split("Heading\n---\nbody");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_consecutive_breaks_collapse() {
        let slides = split("one\n\n---\n\n---\n\ntwo\n\n---\n");
        assert_eq!(slides, vec!["one", "two"]);
    }

    #[test]
    fn test_separator_in_code_fence_no_split() {
        let body = "# Code\n\n```yaml\n\n---\n\nkey: value\n```";
        assert_eq!(split(body).len(), 1);
    }

    #[test]
    fn test_tilde_fence_closes_only_on_matching_char() {
        let body = "~~~\n```\n\n---\n\n~~~\n\n---\n\nafter";
        let slides = split(body);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[1], "after");
    }

    #[test]
    fn test_crlf_input() {
        let slides = split("a\r\n\r\n---\r\n\r\nb");
        assert_eq!(slides, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split("").is_empty());
        assert!(split("\n\n---\n\n").is_empty());
    }
}
