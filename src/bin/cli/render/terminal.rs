use flashdeck_lib::deck::{AudioSource, ContentBlock, NormalizedCard};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render content blocks as indented terminal lines
pub fn render_blocks(blocks: &[ContentBlock], use_color: bool, indent: usize) -> Vec<String> {
    let prefix = " ".repeat(indent);
    blocks
        .iter()
        .filter_map(|block| render_block(block, use_color))
        .map(|line| format!("{}{}", prefix, line))
        .collect()
}

fn render_block(block: &ContentBlock, use_color: bool) -> Option<String> {
    match block {
        ContentBlock::Text(_) | ContentBlock::Markdown(_) | ContentBlock::Html(_) => {
            block.text().map(str::to_string)
        }
        ContentBlock::Audio(audio) => {
            let label = match audio.source()? {
                AudioSource::Url(url) => format!("[audio: {}]", url),
                AudioSource::Inline(_) => "[audio: embedded]".to_string(),
                AudioSource::File(file) => format!("[audio: {}]", file),
            };
            Some(paint(&label, Color::DIM, use_color))
        }
        // Quiz options are rendered from the projected card
        ContentBlock::MultipleChoice(_) | ContentBlock::Unsupported => None,
    }
}

/// Render a practice card: question, options (correct ones marked) and answer
pub fn render_card(card: &NormalizedCard, use_color: bool) -> String {
    let mut lines = vec![paint(&card.id, Color::BOLD, use_color)];

    lines.extend(render_blocks(&card.question, use_color, 2));

    if let Some(options) = &card.options {
        for option in options {
            let marker = if card.correct.contains(&option.id) { "*" } else { "-" };
            let line = format!("  {} {}: {}", marker, option.id, option.content);
            if card.correct.contains(&option.id) {
                lines.push(paint(&line, Color::GREEN, use_color));
            } else {
                lines.push(line);
            }
        }
        if card.is_multi_select() {
            lines.push(paint("  (select all that apply)", Color::DIM, use_color));
        }
    }

    if let Some(answer) = &card.answer {
        lines.push(paint("  =>", Color::CYAN, use_color));
        lines.extend(render_blocks(answer, use_color, 4));
    }

    if let Some(hint) = &card.hint {
        lines.push(paint(&format!("  hint: {}", hint), Color::YELLOW, use_color));
    }
    if let Some(explanation) = &card.explanation {
        lines.push(paint(&format!("  why: {}", explanation), Color::DIM, use_color));
    }

    lines.join("\n")
}
