// Copyright 2019 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::text::constants::RAW_TEXT_ELEMENTS;
use html_escape::decode_html_entities;
use std::borrow::Cow;

/// Removes all markup from an HTML/XML-like string and returns its text content in document order.
///
/// The parsing is lenient and never fails:
/// - start and end tags, comments, declarations (`<!DOCTYPE ...>`) and processing instructions are dropped
/// - a `<` that does not open a tag (for example `a < b`) is kept as text
/// - character references (`&amp;`, `&#39;`, `&#x27;`, `&rarr;`...) are decoded, including the legacy
///   forms without a trailing `;` (`&amp x`). Unknown references are kept as is
/// - the content of `script` and `style` elements is kept verbatim
/// - a construct left unterminated at the end of the input is dropped
///
/// Whitespace is not normalized.
///
/// # Example
///
/// ```
/// use psych_transcripts::text::strip_tags;
///
/// let text = strip_tags("<p>THERAPIST: How are you?</p>\n<p>CLIENT: Fine &amp; you?</p>");
/// assert_eq!(text, "THERAPIST: How are you?\nCLIENT: Fine & you?");
/// ```
pub fn strip_tags(html: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut position = 0;
    while position < html.len() {
        let tag_start = match html[position..].find('<') {
            Some(offset) => position + offset,
            None => {
                output.push_str(&decode_character_references(&html[position..]));
                break;
            }
        };
        output.push_str(&decode_character_references(&html[position..tag_start]));

        let markup = &html[tag_start..];
        position = if markup.starts_with("<!--") {
            match markup[4..].find("-->") {
                Some(end) => tag_start + 4 + end + 3,
                None => break,
            }
        } else if markup.starts_with("</") || markup.starts_with("<!") || markup.starts_with("<?")
        {
            match markup.find('>') {
                Some(end) => tag_start + end + 1,
                None => break,
            }
        } else if markup[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = match find_tag_end(markup) {
                Some(end) => end,
                None => break,
            };
            let content_start = tag_start + end + 1;
            match raw_text_element(&markup[..=end]) {
                Some(name) => {
                    let content = &html[content_start..];
                    match find_closing_tag(content, name) {
                        Some(close) => {
                            output.push_str(&content[..close]);
                            content_start + close
                        }
                        None => break,
                    }
                }
                None => content_start,
            }
        } else if markup.len() > 1 {
            output.push('<');
            tag_start + 1
        } else {
            break;
        };
    }
    output
}

/// Decodes numeric (`&#39;`, `&#x27;`) and named (`&amp;`, `&Aacute;`) character references in a
/// run of text. Plain text is returned borrowed.
pub fn decode_character_references(text: &str) -> Cow<str> {
    decode_html_entities(text)
}

/// Position of the `>` closing a start tag. Quotes only delimit attribute values (after a `=`).
fn find_tag_end(markup: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut previous = '<';
    for (idx, character) in markup.char_indices().skip(1) {
        match quote {
            Some(open_quote) => {
                if character == open_quote {
                    quote = None;
                }
            }
            None => match character {
                '"' | '\'' if previous == '=' => quote = Some(character),
                '>' => return Some(idx),
                _ => {}
            },
        }
        if !character.is_whitespace() {
            previous = character;
        }
    }
    None
}

fn raw_text_element(start_tag: &str) -> Option<&'static str> {
    if start_tag.ends_with("/>") {
        return None;
    }
    let name: String = start_tag[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    RAW_TEXT_ELEMENTS
        .iter()
        .find(|element| element.eq_ignore_ascii_case(&name))
        .copied()
}

fn find_closing_tag(content: &str, name: &str) -> Option<usize> {
    content.match_indices("</").map(|(idx, _)| idx).find(|idx| {
        content
            .get(idx + 2..idx + 2 + name.len())
            .map_or(false, |candidate| candidate.eq_ignore_ascii_case(name))
    })
}

//==============================
// Unit tests
//==============================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        //        Given
        let test_tuples = [
            ("<p>Hello <b>world</b></p>", "Hello world"),
            ("no markup at all", "no markup at all"),
            ("", ""),
            ("<br/>line<br />break", "linebreak"),
            ("x<!-- hidden <b>comment</b> -->y", "xy"),
            ("<!DOCTYPE html><html><body>Hi</body></html>", "Hi"),
            ("<?xml version=\"1.0\"?><root>data</root>", "data"),
            ("<a href='x>y'>link</a>", "link"),
            ("<p class=\"note\" data-x=\"a > b\">quoted</p>", "quoted"),
            ("<p>Café – déjà vu</p>", "Café – déjà vu"),
            ("  <i>keep</i>  spacing\n\n", "  keep  spacing\n\n"),
        ];

        //        When & Then
        for (source, expected) in test_tuples.iter() {
            assert_eq!(strip_tags(source), *expected);
        }
    }

    #[test]
    fn test_strip_tags_malformed_markup() {
        //        Given
        let test_tuples = [
            ("a < b and c > d", "a < b and c > d"),
            ("3 <4", "3 <4"),
            ("text <b", "text "),
            ("unterminated <!-- comment", "unterminated "),
            ("trailing <", "trailing "),
            ("</>empty end tag", "empty end tag"),
            ("</ 3>bogus", "bogus"),
            ("<b>unclosed bold", "unclosed bold"),
            ("stray end</i> tag", "stray end tag"),
        ];

        //        When & Then
        for (source, expected) in test_tuples.iter() {
            assert_eq!(strip_tags(source), *expected);
        }
    }

    #[test]
    fn test_strip_tags_raw_text_elements() {
        //        Given
        let source = "<script type=\"text/javascript\">if (a < b && c) {}</SCRIPT>done<style>p > a {}</style>";

        //        When
        let stripped = strip_tags(source);

        //        Then
        assert_eq!(stripped, "if (a < b && c) {}donep > a {}");
    }

    #[test]
    fn test_strip_tags_character_references() {
        //        Given
        let test_tuples = [
            (
                "<p>Tom &amp; Jerry &lt;3 &#39;quoted&#x27; &bogus; R&D</p>",
                "Tom & Jerry <3 'quoted' &bogus; R&D",
            ),
            (
                "Tom &amp; Jerry &amp x &Aacute; &rarr; &hellip; &ouml x",
                "Tom & Jerry & x \u{C1} \u{2192} \u{2026} \u{F6} x",
            ),
        ];

        //        When & Then
        for (source, expected) in test_tuples.iter() {
            assert_eq!(strip_tags(source), *expected);
        }
    }

    #[test]
    fn test_strip_tags_idempotence() {
        //        Given
        let sources = [
            "<div>THERAPIST: How are you?</div>\n<div>CLIENT: I am okay today</div>",
            "plain transcript\nwith lines",
        ];

        //        When & Then
        for source in sources.iter() {
            let stripped = strip_tags(source);
            assert_eq!(strip_tags(&stripped), stripped);
        }
    }

    #[test]
    fn test_decode_character_references_borrows_plain_text() {
        assert!(matches!(
            decode_character_references("nothing to decode"),
            Cow::Borrowed(_)
        ));
        assert_eq!(decode_character_references("&#65;&#x42;&#67;"), "ABC");
        assert_eq!(decode_character_references("&lt;b&gt;"), "<b>");
    }
}
