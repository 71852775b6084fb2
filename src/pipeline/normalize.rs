// Inclusive code point ranges removed from every phrase: emoticons, pictographs,
// transport symbols, regional indicators, dingbats, variation selectors and ZWJ.
pub const DECORATION_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F),
    (0x1F300, 0x1F5FF),
    (0x1F680, 0x1F6FF),
    (0x1F1E6, 0x1F1FF),
    (0x2600, 0x26FF),
    (0x2700, 0x27BF),
    (0xFE00, 0xFE0F),
    (0x1F900, 0x1F9FF),
    (0x1F018, 0x1F270),
    (0x1F400, 0x1F7FF),
    (0x200D, 0x200D),
    (0x1F90D, 0x1F93A),
    (0x1F980, 0x1F9E0),
];

pub fn is_decoration(ch: char) -> bool {
    let code = u32::from(ch);
    DECORATION_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

pub fn strip_decoration(text: &str) -> String {
    let stripped: String = text.chars().filter(|&ch| !is_decoration(ch)).collect();
    stripped.trim().to_string()
}
