use std::fs;
use std::io;
use std::path::Path;

/// Reads a batch script: one command per line, `#` comments, `\` continues a line.
pub fn parse_script_file(path: &Path) -> Result<Vec<String>, io::Error> {
    let text = fs::read_to_string(path)?;
    Ok(parse_script(&text))
}

pub fn parse_script(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut current_command = String::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() && current_command.is_empty() {
            continue;
        }

        if trimmed.starts_with('#') {
            continue;
        }

        if let Some(stripped) = trimmed.strip_suffix('\\') {
            current_command.push_str(stripped.trim());
            current_command.push(' ');
        } else {
            current_command.push_str(trimmed);
            let finished = current_command.trim().to_string();
            if !finished.is_empty() {
                commands.push(finished);
            }
            current_command.clear();
        }
    }

    let rest = current_command.trim();
    if !rest.is_empty() {
        commands.push(rest.to_string());
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let script = "# nightly refresh\n\ncreate nightly\n  version  \n";
        assert_eq!(parse_script(script), vec!["create nightly", "version"]);
    }

    #[test]
    fn joins_continued_lines() {
        let script = "add-file 0A1B2C3D-0000-1111-2222-333344445555 \\\n    http://example.com/a \\\n    c:\\temp\\a\n";
        assert_eq!(
            parse_script(script),
            vec!["add-file 0A1B2C3D-0000-1111-2222-333344445555 http://example.com/a c:\\temp\\a"]
        );
    }

    #[test]
    fn trailing_continuation_is_kept() {
        assert_eq!(parse_script("list \\"), vec!["list"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_script_file(Path::new("/definitely/not/here.bits")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
