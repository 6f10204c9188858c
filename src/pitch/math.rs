// Pitch math - conversions between frequency, MIDI numbers, and pitch names
// All functions are pure; out-of-range inputs map to None, never to a clamp

/// Reference tuning: A4 = 440 Hz = MIDI 69
pub const A4_FREQUENCY_HZ: f64 = 440.0;

/// Lowest usable pitch: C2
pub const MIDI_MIN: i32 = 36;

/// Highest usable pitch: C8
pub const MIDI_MAX: i32 = 108;

/// Chromatic note names, starting at C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Convert a frequency in Hz to the nearest MIDI number.
///
/// Returns `None` for non-positive frequencies. The result is not range
/// checked; use [`frequency_to_note_name`] when the C2..C8 policy applies.
pub fn frequency_to_midi(frequency_hz: f64) -> Option<i32> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return None;
    }
    let semitone_offset = 12.0 * (frequency_hz / A4_FREQUENCY_HZ).log2();
    Some(semitone_offset.round() as i32 + 69)
}

/// Equal-tempered frequency of a MIDI number
pub fn midi_to_frequency(midi: i32) -> f64 {
    A4_FREQUENCY_HZ * 2f64.powf((midi - 69) as f64 / 12.0)
}

/// Pitch name of a MIDI number (e.g. 69 -> "A4", 61 -> "C#4")
pub fn midi_to_note_name(midi: i32) -> String {
    let octave = midi.div_euclid(12) - 1;
    let index = midi.rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[index], octave)
}

/// Parse a pitch name back to its MIDI number.
///
/// Accepts a letter A-G, an optional sharp, and a single octave digit
/// ("C#4", "G7"). Returns `None` on anything else.
pub fn note_name_to_midi(name: &str) -> Option<i32> {
    if !name.is_ascii() {
        return None;
    }
    let (head, octave_char) = name.split_at(name.len().checked_sub(1)?);
    let octave = octave_char.chars().next()?.to_digit(10)? as i32;
    let index = NOTE_NAMES.iter().position(|n| *n == head)?;
    Some(index as i32 + (octave + 1) * 12)
}

/// Convert a frequency straight to a pitch name within the C2..C8 range.
///
/// Returns `None` for unvoiced/invalid frequencies and for pitches that
/// round outside MIDI [36, 108].
pub fn frequency_to_note_name(frequency_hz: f64) -> Option<String> {
    let midi = frequency_to_midi(frequency_hz)?;
    if !(MIDI_MIN..=MIDI_MAX).contains(&midi) {
        return None;
    }
    Some(midi_to_note_name(midi))
}

/// Absolute semitone distance between two pitch names.
///
/// Returns 0 if either name fails to parse; detector glue treats an
/// unparseable comparison as "no movement" rather than an error.
pub fn semitone_distance(name_a: &str, name_b: &str) -> i32 {
    match (note_name_to_midi(name_a), note_name_to_midi(name_b)) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => 0,
    }
}
