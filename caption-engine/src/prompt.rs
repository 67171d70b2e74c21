//! Instruction template for caption generation.

/// Fixed instructions sent with every image.
pub const CAPTION_INSTRUCTIONS: &str = "\
Generate exactly **10** witty, suggestive, and humorous captions based on the given image.
Each caption must be a **short, clever one-liner** with a **playful** and **humorous** tone.

⚠️ **Only 10 captions. Do NOT exceed this limit.**

Format the response as follows, including emojis:
1️⃣ [first caption]
2️⃣ [second caption]
3️⃣ [third caption]
4️⃣ [fourth caption]
5️⃣ [fifth caption]
6️⃣ [sixth caption]
7️⃣ [seventh caption]
8️⃣ [eighth caption]
9️⃣ [ninth caption]
🔟 [tenth caption]";

/// Appends the caller's steering text (if any) on its own line.
pub fn build_prompt(user_prompt: Option<&str>) -> String {
    match user_prompt.map(str::trim).filter(|p| !p.is_empty()) {
        Some(extra) => format!("{CAPTION_INSTRUCTIONS}\n{extra}"),
        None => CAPTION_INSTRUCTIONS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_user_prompt_on_new_line() {
        let p = build_prompt(Some("  make them about cats "));
        assert!(p.starts_with(CAPTION_INSTRUCTIONS));
        assert!(p.ends_with("\nmake them about cats"));
    }

    #[test]
    fn blank_prompt_is_ignored() {
        assert_eq!(build_prompt(Some("   ")), CAPTION_INSTRUCTIONS);
        assert_eq!(build_prompt(None), CAPTION_INSTRUCTIONS);
    }
}
