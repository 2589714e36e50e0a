use crate::entry::ClockConvention;

const MINUTE_CEILING: u32 = 59;

/// Masks raw keystrokes into a partial or complete clock string.
///
/// Returns `None` when the hour or minute position holds a non-digit, in which
/// case the caller keeps whatever text it showed before. The result is always a
/// left-anchored truncation or clamp of the input, so masking the output again
/// yields the same string.
pub fn mask_input(raw: &str, convention: ClockConvention) -> Option<String> {
    let cleaned: Vec<char> = raw
        .to_uppercase()
        .trim()
        .chars()
        .filter(|ch| *ch != ':' && *ch != ' ')
        .collect();
    if cleaned.is_empty() {
        return Some(String::new());
    }

    let hour_ceiling = convention.hour_ceiling();
    let padded = pad_leading_digits(cleaned, hour_ceiling);

    let hour_chunk = chunk(&padded, 0..2);
    let minute_chunk = chunk(&padded, 2..4);
    let meridiem_chunk = chunk(&padded, 4..6);

    let digits_only = hour_chunk
        .chars()
        .chain(minute_chunk.chars())
        .all(|ch| ch.is_ascii_digit());
    if !digits_only {
        return None;
    }

    let hour = clamp_field(&hour_chunk, hour_ceiling, zero_hour(convention));
    let minute = clamp_field(&minute_chunk, MINUTE_CEILING, "00");
    let meridiem = match convention {
        ClockConvention::Hour12 => mask_meridiem(&meridiem_chunk),
        ClockConvention::Hour24 => String::new(),
    };

    let mut masked = hour;
    if !minute.is_empty() {
        masked.push(':');
        masked.push_str(&minute);
    }
    if !meridiem.is_empty() {
        masked.push(' ');
        masked.push_str(&meridiem);
    }
    Some(masked)
}

// A digit that cannot start a valid two-digit field is a complete field on its
// own, so it gets its leading zero before chunking.
fn pad_leading_digits(mut cleaned: Vec<char>, hour_ceiling: u32) -> Vec<char> {
    if needs_padding(cleaned.first(), hour_ceiling / 10) {
        cleaned.insert(0, '0');
    }
    if needs_padding(cleaned.get(2), MINUTE_CEILING / 10) {
        cleaned.insert(2, '0');
    }
    cleaned
}

fn needs_padding(ch: Option<&char>, max_leading: u32) -> bool {
    ch.and_then(|ch| ch.to_digit(10))
        .is_some_and(|digit| digit > max_leading)
}

fn chunk(chars: &[char], range: std::ops::Range<usize>) -> String {
    let end = range.end.min(chars.len());
    let start = range.start.min(end);
    chars[start..end].iter().collect()
}

fn zero_hour(convention: ClockConvention) -> &'static str {
    match convention {
        ClockConvention::Hour12 => "01",
        ClockConvention::Hour24 => "00",
    }
}

fn clamp_field(field: &str, ceiling: u32, zero_replacement: &str) -> String {
    let Ok(value) = field.parse::<u32>() else {
        return field.to_string();
    };
    match field.len() {
        1 if value > ceiling / 10 => format!("0{value}"),
        2 if value == 0 => zero_replacement.to_string(),
        2 if value > ceiling => format!("{ceiling:02}"),
        _ => field.to_string(),
    }
}

fn mask_meridiem(chunk: &str) -> String {
    let mut chars = chunk.chars();
    let first = match chars.next() {
        Some(first @ ('A' | 'P')) => first,
        _ => return String::new(),
    };
    match chars.next() {
        Some('M') => format!("{first}M"),
        _ => first.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H12: ClockConvention = ClockConvention::Hour12;
    const H24: ClockConvention = ClockConvention::Hour24;

    fn masked(raw: &str, convention: ClockConvention) -> String {
        mask_input(raw, convention).expect("input should mask")
    }

    #[test]
    fn masks_unpunctuated_twelve_hour_input() {
        assert_eq!(masked("945a", H12), "09:45 A");
        assert_eq!(masked("945am", H12), "09:45 AM");
        assert_eq!(masked("9 45 a", H12), "09:45 A");
        assert_eq!(masked("9:45a", H12), "09:45 A");
        assert_eq!(masked("  1130pm ", H12), "11:30 PM");
    }

    #[test]
    fn clamps_twenty_four_hour_input() {
        assert_eq!(masked("2500", H24), "23:00");
        assert_eq!(masked("3", H24), "03");
        assert_eq!(masked("2", H24), "2");
        assert_eq!(masked("00", H24), "00");
        assert_eq!(masked("0000pm", H24), "00:00");
    }

    #[test]
    fn hour_field_follows_convention_ceiling() {
        assert_eq!(masked("3", H12), "03");
        assert_eq!(masked("2", H12), "02");
        assert_eq!(masked("1", H12), "1");
        assert_eq!(masked("00", H12), "01");
        assert_eq!(masked("15", H12), "12");
        assert_eq!(masked("12", H12), "12");
    }

    #[test]
    fn minute_field_pads_and_clamps() {
        assert_eq!(masked("097", H12), "09:07");
        assert_eq!(masked("095", H12), "09:5");
        assert_eq!(masked("0900", H12), "09:00");
        assert_eq!(masked("0959", H24), "09:59");
        assert_eq!(masked("09:5", H24), "09:5");
    }

    #[test]
    fn meridiem_keeps_only_recognised_letters() {
        assert_eq!(masked("0945x", H12), "09:45");
        assert_eq!(masked("0945ax", H12), "09:45 A");
        assert_eq!(masked("0945P", H12), "09:45 P");
        assert_eq!(masked("0945pm", H12), "09:45 PM");
        assert_eq!(masked("094512", H12), "09:45");
        assert_eq!(masked("0945am", H24), "09:45");
    }

    #[test]
    fn rejects_non_digits_in_hour_or_minute() {
        assert_eq!(mask_input("a", H12), None);
        assert_eq!(mask_input("9a", H12), None);
        assert_eq!(mask_input("09:4a", H12), None);
        assert_eq!(mask_input("1.30", H24), None);
    }

    #[test]
    fn empty_input_masks_to_empty_text() {
        assert_eq!(masked("", H12), "");
        assert_eq!(masked("   ", H24), "");
        assert_eq!(masked(":", H12), "");
    }

    #[test]
    fn masking_is_idempotent_on_its_output() {
        let inputs = [
            "945a", "945am", "2500", "1", "12", "00", "097", "0945x", "1130pm", "2359",
            "0", "9:4", "12:00 PM", "7p", "23", "5",
        ];
        for convention in [H12, H24] {
            for raw in inputs {
                let Some(once) = mask_input(raw, convention) else {
                    continue;
                };
                let twice = mask_input(&once, convention).expect("masked text stays maskable");
                assert_eq!(twice, once, "re-masking {raw:?} under {convention:?}");
            }
        }
    }

    #[test]
    fn typing_one_character_at_a_time_matches_one_pass() {
        let keystrokes = "945am";
        let mut shown = String::new();
        for ch in keystrokes.chars() {
            let next = format!("{shown}{ch}");
            if let Some(value) = mask_input(&next, H12) {
                shown = value;
            }
        }
        assert_eq!(shown, masked(keystrokes, H12));
    }
}
