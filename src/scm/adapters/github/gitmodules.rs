//! Minimal `.gitmodules` reader.

/// One `[submodule "..."]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SubmoduleEntry {
    pub path: String,
    pub url: String,
}

/// Parses submodule sections in file order. Sections missing `path` or
/// `url` are skipped.
pub(super) fn parse_gitmodules(contents: &str) -> Vec<SubmoduleEntry> {
    let mut entries = Vec::new();
    let mut path: Option<String> = None;
    let mut url: Option<String> = None;

    let mut flush = |path: &mut Option<String>, url: &mut Option<String>| {
        if let (Some(found_path), Some(found_url)) = (path.take(), url.take()) {
            entries.push(SubmoduleEntry {
                path: found_path,
                url: found_url,
            });
        }
    };

    for line in contents.lines().map(str::trim) {
        if line.starts_with('[') {
            flush(&mut path, &mut url);
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "path" => path = Some(value.trim().to_owned()),
            "url" => url = Some(value.trim().to_owned()),
            _ => {}
        }
    }
    flush(&mut path, &mut url);
    entries
}

/// Extracts the repository name from a clone URL
/// (`git@host:org/name.git` or `https://host/org/name.git`).
pub(super) fn repository_name_from_url(url: &str) -> Option<&str> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then_some(name)
}
