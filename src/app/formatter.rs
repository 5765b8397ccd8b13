use crate::app::models::{dir_name, FileSection, GeneratedDocument, MatchKind, ScanConfig};
use crate::app::tree::{DirNode, TreeBuilder};

pub struct OutputGenerator;

impl OutputGenerator {
    /// Puts the collected sections in tree order and renders the tree from
    /// exactly those files, so counts, tree and code blocks always agree.
    pub fn assemble(config: &ScanConfig, mut sections: Vec<FileSection>) -> GeneratedDocument {
        sections.sort_by(|a, b| {
            a.file
                .relative_path
                .split('/')
                .cmp(b.file.relative_path.split('/'))
        });

        let tree = DirNode::from_files(sections.iter().map(|s| &s.file));
        debug_assert_eq!(tree.file_count(), sections.len());
        let tree_text = TreeBuilder::render_node(&dir_name(config.root()), &tree);

        GeneratedDocument {
            header: config.display_name(),
            filter: config.filter(),
            tree_text,
            sections,
        }
    }

    pub fn render(doc: &GeneratedDocument) -> String {
        let mut blocks = vec![
            format!("# {}", doc.header),
            "## Metadata".to_string(),
            format!(
                "- Total number of files: {}\n- Total number of '{}' files: {}\n- Total number of infrastructure files: {}",
                doc.file_count(),
                doc.filter,
                doc.count_of(MatchKind::Source),
                doc.count_of(MatchKind::Infrastructure),
            ),
            fenced(&doc.tree_text, ""),
            "## Code".to_string(),
        ];

        for section in &doc.sections {
            blocks.push(format!("### {}", section.file.relative_path));
            blocks.push(fenced(&section.content, section.file.language()));
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

/// Wraps `content` in a backtick fence longer than any backtick run inside it.
fn fenced(content: &str, language: &str) -> String {
    let fence = "`".repeat(fence_len(content));
    let mut out = format!("{}{}\n{}", fence, language, content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out
}

fn fence_len(content: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for ch in content.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    (longest + 1).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{ExtensionFilter, MatchedFile};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn section(rel: &str, kind: MatchKind, content: &str) -> FileSection {
        FileSection {
            file: MatchedFile {
                path: PathBuf::from("/x/my_project").join(rel),
                relative_path: rel.to_string(),
                depth: rel.matches('/').count(),
                kind,
            },
            content: content.to_string(),
        }
    }

    fn document(sections: Vec<FileSection>) -> GeneratedDocument {
        GeneratedDocument {
            header: "my_project".to_string(),
            filter: ExtensionFilter::Py,
            tree_text: "my_project/\n    a.py".to_string(),
            sections,
        }
    }

    #[test]
    fn test_render_full_layout() {
        let doc = document(vec![
            section("a.py", MatchKind::Source, "print('a')\n"),
            section("Dockerfile", MatchKind::Infrastructure, "FROM python"),
        ]);
        let expected = "# my_project\n\n\
## Metadata\n\n\
- Total number of files: 2\n\
- Total number of 'py' files: 1\n\
- Total number of infrastructure files: 1\n\n\
```\nmy_project/\n    a.py\n```\n\n\
## Code\n\n\
### a.py\n\n\
```py\nprint('a')\n```\n\n\
### Dockerfile\n\n\
```\nFROM python\n```\n";
        assert_eq!(OutputGenerator::render(&doc), expected);
    }

    #[test]
    fn test_header_count_matches_stated_total() {
        let doc = document(vec![
            section("a.py", MatchKind::Source, "a"),
            section("b.py", MatchKind::Source, "b"),
            section("c/d.py", MatchKind::Source, "d"),
        ]);
        let out = OutputGenerator::render(&doc);
        let headers = out.lines().filter(|l| l.starts_with("### ")).count();
        assert_eq!(headers, 3);
        assert!(out.contains("- Total number of files: 3\n"));
    }

    #[test]
    fn test_fence_outgrows_embedded_backticks() {
        let content = "doc = \"\"\"\n```python\nx = 1\n```\n\"\"\"\n";
        let out = fenced(content, "py");
        assert!(out.starts_with("````py\n"));
        assert!(out.ends_with("\n````"));
        assert!(out.contains(content));

        assert_eq!(fence_len("no ticks"), 3);
        assert_eq!(fence_len("``"), 3);
        assert_eq!(fence_len("`````"), 6);
    }

    #[test]
    fn test_empty_content_block() {
        assert_eq!(fenced("", "py"), "```py\n```");
    }

    #[test]
    fn test_assemble_orders_sections_like_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("my_project");
        fs::create_dir(&root).unwrap();
        let config = ScanConfig::builder(&root, "py").build().unwrap();

        let doc = OutputGenerator::assemble(
            &config,
            vec![
                section("z.py", MatchKind::Source, "z"),
                section("sub/b.py", MatchKind::Source, "b"),
                section("a.py", MatchKind::Source, "a"),
                section("sub-x.py", MatchKind::Source, "x"),
            ],
        );

        let order: Vec<_> = doc
            .sections
            .iter()
            .map(|s| s.file.relative_path.as_str())
            .collect();
        assert_eq!(order, vec!["a.py", "sub/b.py", "sub-x.py", "z.py"]);
        assert_eq!(
            doc.tree_text,
            "my_project/\n    a.py\n    sub/\n        b.py\n    sub-x.py\n    z.py"
        );
        assert_eq!(doc.header, "my_project");
    }

    #[test]
    fn test_assemble_uses_title() {
        let dir = tempdir().unwrap();
        let config = ScanConfig::builder(dir.path(), "sql")
            .title(Some("Demo".into()))
            .build()
            .unwrap();
        let doc = OutputGenerator::assemble(&config, Vec::new());
        assert!(OutputGenerator::render(&doc).starts_with("# Demo\n\n## Metadata"));
        assert_eq!(doc.file_count(), 0);
    }
}
