use crate::corpus::Token;
use crate::model::stanza::Song;

/// Joins the tokens of a line with spaces and capitalises its first letter.
pub fn render_line(line: &[Token]) -> String {
	let text = line.join(" ");
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => text,
	}
}

/// Renders one stanza, one line per row.
pub fn render_stanza(stanza: &[Vec<Token>]) -> String {
	stanza.iter().map(|line| render_line(line)).collect::<Vec<_>>().join("\n")
}

/// Renders a song as verse one, chorus, verse two, chorus.
///
/// Stanzas are separated by a blank line.
pub fn render_song(song: &Song) -> String {
	[&song.verse_one, &song.chorus, &song.verse_two, &song.chorus]
		.into_iter()
		.map(|stanza| render_stanza(stanza))
		.collect::<Vec<_>>()
		.join("\n\n")
}
