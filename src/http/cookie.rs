/// Look up `name` in a `document.cookie`-style string (`a=1; b=2`).
///
/// The first entry whose text starts with `name=` wins and its remainder is
/// percent-decoded. Returns `None` when there are no cookies or no match.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let prefix = format!("{}=", name);
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(decode)
}

fn decode(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned(),
    }
}
