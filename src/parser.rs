use crate::core::FlashcardDefinition;

struct Delimiters {
    start: String,
    back: String,
    end: String,
}

impl Delimiters {
    fn new(marker: &str) -> Self {
        Self {
            start: format!("<!--{marker}-START-->"),
            back: format!("<!--{marker}-BACK-->"),
            end: format!("<!--{marker}-END-->"),
        }
    }
}

fn line_at(content: &str, offset: usize) -> usize {
    // A CRLF pair holds exactly one '\n', so counting '\n' covers both endings.
    content.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

fn first_non_whitespace(text: &str) -> Option<usize> {
    text.char_indices().find(|(_, c)| !c.is_whitespace()).map(|(idx, _)| idx)
}

/// Pulls every `<!--{marker}-START--> front <!--{marker}-BACK--> back <!--{marker}-END-->`
/// triple out of `content`, in document order.
///
/// A start token without a following divider or end token is skipped and the
/// scan resumes right after it. Cards whose front or back is blank are dropped
/// silently. An empty marker yields no cards.
pub fn extract_flashcards(content: &str, marker: &str) -> Vec<FlashcardDefinition> {
    let marker = marker.trim();
    if marker.is_empty() {
        return Vec::new();
    }

    let tokens = Delimiters::new(marker);
    let mut cards = Vec::new();
    let mut cursor = 0;

    while cursor < content.len() {
        let Some(start_idx) = content[cursor..].find(&tokens.start).map(|i| i + cursor) else {
            break;
        };
        let front_start = start_idx + tokens.start.len();

        let Some(back_idx) = content[front_start..].find(&tokens.back).map(|i| i + front_start)
        else {
            cursor = front_start;
            continue;
        };
        let back_start = back_idx + tokens.back.len();

        let Some(end_idx) = content[back_start..].find(&tokens.end).map(|i| i + back_start) else {
            cursor = front_start;
            continue;
        };

        let raw_front = &content[front_start..back_idx];
        let raw_back = &content[back_start..end_idx];
        let front = raw_front.trim();
        let back = raw_back.trim();

        if !front.is_empty() && !back.is_empty() {
            let position = first_non_whitespace(raw_front)
                .map(|offset| front_start + offset)
                .unwrap_or(start_idx);

            cards.push(FlashcardDefinition {
                front: front.to_string(),
                back: back.to_string(),
                line_number: line_at(content, position),
            });
        }

        cursor = end_idx + tokens.end.len();
    }

    cards
}
