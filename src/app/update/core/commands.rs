use super::super::super::messages::Message;
use crate::gesture::DragSample;
use crate::model::{NarratorId, WordId};

/// Parses one line of driver input into the messages it stands for.
///
/// `swipe DX DY VX` expands into a full pointer sequence starting at the
/// middle of the viewport. Unknown or malformed input yields `None`.
pub fn parse_command(line: &str, viewport_width: f32) -> Option<Vec<Message>> {
    let mut tokens = line.split_whitespace();
    let verb = normalize_command_token(tokens.next()?);
    let args: Vec<&str> = tokens.collect();

    let messages = match (verb.as_str(), args.as_slice()) {
        ("goto" | "g", [page]) => vec![Message::GoTo(page.parse().ok()?)],
        ("next" | "n", []) => vec![Message::NextPage],
        ("prev" | "p", []) => vec![Message::PreviousPage],
        ("open", []) => vec![Message::OpenDrawer],
        ("close", []) => vec![Message::CloseDrawer],
        ("drawer" | "toggle", []) => vec![Message::ToggleDrawer],
        ("narrator", [id]) => vec![Message::ToggleNarrator(NarratorId(id.parse().ok()?))],
        ("save", [word, narrator, content @ ..]) if !content.is_empty() => {
            vec![Message::SaveAnnotation {
                word_id: WordId(word.parse().ok()?),
                narrator_id: NarratorId(narrator.parse().ok()?),
                content: content.join(" "),
            }]
        }
        ("delete", [word, narrator]) => vec![Message::DeleteAnnotation {
            word_id: WordId(word.parse().ok()?),
            narrator_id: NarratorId(narrator.parse().ok()?),
        }],
        ("swipe", [dx, dy, vx]) => {
            let sample = DragSample::new(dx.parse().ok()?, dy.parse().ok()?, vx.parse().ok()?);
            vec![
                Message::PointerDown {
                    x: viewport_width / 2.0,
                    y: 0.0,
                },
                Message::PointerMove(sample),
                Message::PointerUp(sample),
            ]
        }
        ("resize", [width]) => vec![Message::ViewportResized {
            width: width.parse().ok()?,
        }],
        ("quit" | "q" | "exit", []) => vec![Message::Quit],
        _ => return None,
    };
    Some(messages)
}

fn normalize_command_token(raw: &str) -> String {
    let token = raw.trim().to_ascii_lowercase();
    match token.as_str() {
        "previous" | "back" => "prev".to_string(),
        "forward" => "next".to_string(),
        "go" => "goto".to_string(),
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(line: &str) -> Message {
        let mut messages = parse_command(line, 390.0).expect("parses");
        assert_eq!(messages.len(), 1, "{line}");
        messages.remove(0)
    }

    #[test]
    fn navigation_commands() {
        assert!(matches!(single("goto 12"), Message::GoTo(12)));
        assert!(matches!(single("  GO -3 "), Message::GoTo(-3)));
        assert!(matches!(single("next"), Message::NextPage));
        assert!(matches!(single("Back"), Message::PreviousPage));
        assert!(parse_command("goto", 390.0).is_none());
        assert!(parse_command("goto twelve", 390.0).is_none());
    }

    #[test]
    fn swipe_expands_to_a_pointer_sequence() {
        let messages = parse_command("swipe -250 4 -100", 400.0).expect("parses");
        assert!(matches!(
            messages.as_slice(),
            [
                Message::PointerDown { x, .. },
                Message::PointerMove(_),
                Message::PointerUp(up),
            ] if *x == 200.0 && up.dx == -250.0 && up.vx == -100.0
        ));
    }

    #[test]
    fn annotation_commands_keep_free_text() {
        match single("save 301 2 some longer text") {
            Message::SaveAnnotation {
                word_id,
                narrator_id,
                content,
            } => {
                assert_eq!(word_id, WordId(301));
                assert_eq!(narrator_id, NarratorId(2));
                assert_eq!(content, "some longer text");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_command("save 301 2", 390.0).is_none());
        assert!(matches!(single("delete 301 2"), Message::DeleteAnnotation { .. }));
    }

    #[test]
    fn unknown_input_is_rejected() {
        assert!(parse_command("", 390.0).is_none());
        assert!(parse_command("dance", 390.0).is_none());
        assert!(parse_command("next 3", 390.0).is_none());
    }
}
