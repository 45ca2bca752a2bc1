//! Spoken keywords of the voice pipeline.

/// Names that wake the bot
pub const WAKE_WORDS: [&str; 3] = ["영웅", "영웅아", "영웅이"];

/// Punctuation the recognizer may attach to a wake word
const WAKE_SUFFIXES: [char; 4] = ['.', '!', '?', '~'];

/// Words that end a conversation when spoken last
pub const TERMINATION_KEYWORDS: [&str; 5] = ["종료", "그만", "멈춰", "끝", "종료해줘"];

/// A single word naming the bot, bare or with one trailing mark.
pub fn is_wake_word(word: &str) -> bool {
    let bare = match word.strip_suffix(WAKE_SUFFIXES) {
        Some(stripped) => stripped,
        None => word,
    };
    WAKE_WORDS.contains(&bare)
}

/// First wake word in a transcript.
pub fn find_wake_word(transcript: &str) -> Option<&str> {
    transcript.split_whitespace().find(|w| is_wake_word(w))
}

/// Termination keyword closing a transcript, sentence marks ignored.
pub fn termination_keyword(transcript: &str) -> Option<&'static str> {
    let last = transcript.split_whitespace().last()?;
    let bare = last.trim_end_matches(['.', '!', '?']);
    TERMINATION_KEYWORDS.iter().copied().find(|k| *k == bare)
}
