pub mod splitter;

use splitter::{closes_fence, opens_fence};

/// A renderable block of slide or note content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    ListItem { depth: usize, text: String },
    CodeBlock { code: String },
    Quote { text: String },
    HorizontalRule,
}

/// Parse a slide (or presenter note) into blocks.
///
/// This is a deliberately small markdown subset: ATX headings, paragraphs,
/// `-`/`*`/`+` and numbered list items, fenced code, `>` quotes and rules.
/// Consecutive paragraph lines are joined with a space.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Option<(char, usize, Vec<&str>)> = None;

    for line in source.lines() {
        let trimmed = line.trim();

        if let Some((fence_char, fence_len, lines)) = code.as_mut() {
            if closes_fence(trimmed, *fence_char, *fence_len) {
                blocks.push(Block::CodeBlock {
                    code: lines.join("\n"),
                });
                code = None;
            } else {
                lines.push(line);
            }
            continue;
        }

        if let Some((fence_char, fence_len)) = opens_fence(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            code = Some((fence_char, fence_len, Vec::new()));
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(heading) = parse_heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(heading);
        } else if trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-' || c == '*') {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::HorizontalRule);
        } else if let Some(text) = list_item_text(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let indent = line.len() - line.trim_start().len();
            blocks.push(Block::ListItem {
                depth: indent / 2,
                text: text.to_string(),
            });
        } else if let Some(text) = trimmed.strip_prefix('>') {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(Block::Quote {
                text: text.trim().to_string(),
            });
        } else {
            paragraph.push(trimmed);
        }
    }

    // An unterminated fence still renders what it holds
    if let Some((_, _, lines)) = code {
        blocks.push(Block::CodeBlock {
            code: lines.join("\n"),
        });
    }
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks
}

fn flush_paragraph(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph {
            text: paragraph.join(" "),
        });
        paragraph.clear();
    }
}

fn parse_heading(trimmed: &str) -> Option<Block> {
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some(Block::Heading {
        level: level as u8,
        text: rest.trim().trim_end_matches('#').trim_end().to_string(),
    })
}

fn list_item_text(trimmed: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(text) = trimmed.strip_prefix(marker) {
            return Some(text.trim());
        }
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(text) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(text.trim());
        }
    }
    None
}

/// First heading text of a slide, used for titles and the `check` listing.
pub fn title_of(blocks: &[Block]) -> Option<&str> {
    blocks.iter().find_map(|b| match b {
        Block::Heading { text, .. } => Some(text.as_str()),
        _ => None,
    })
}
