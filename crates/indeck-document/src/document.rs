use crate::value::Value;

/// A parsed input deck.
///
/// Owns the top-level sequence of sections and keywords in declaration
/// order. The tree is append-only during construction and immutable
/// afterwards; nothing in it is shared between nodes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    nodes: Vec<Node>,
}

/// One child of a section (or of the document root).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Section(Section),
    Keyword(Keyword),
}

/// A named, nestable container opened with `&NAME` and closed by `&END`.
///
/// `name` keeps the casing found in the input; all lookups compare
/// case-insensitively. `parameter` is the free text trailing the name on
/// the opening line (`&KIND Na` has parameter `Na`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub name: String,
    pub parameter: Option<String>,
    pub children: Vec<Node>,
}

/// A named leaf record holding ordered value tokens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyword {
    pub name: String,
    pub values: Vec<Value>,
}

impl Node {
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Section(section) => Some(section),
            Node::Keyword(_) => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Node::Keyword(keyword) => Some(keyword),
            Node::Section(_) => None,
        }
    }
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter: None,
            children: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// All direct child sections, in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.children.iter().filter_map(Node::as_section)
    }

    /// All direct child keywords, in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.children.iter().filter_map(Node::as_keyword)
    }

    /// The first direct child section with the given name (case-insensitive).
    pub fn section(&self, name: &str) -> Option<&Section> {
        find_section(&self.children, name)
    }

    /// All direct child sections with the given name, in declaration order.
    pub fn sections_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Section> {
        self.sections()
            .filter(move |s| s.name.eq_ignore_ascii_case(name))
    }

    /// The first direct child keyword with the given name (case-insensitive).
    pub fn keyword(&self, name: &str) -> Option<&Keyword> {
        find_keyword(&self.children, name)
    }

    /// All direct child keywords with the given name, in declaration order.
    ///
    /// Repeated keywords are kept as-is by the parser; consumers that treat
    /// repeats additively iterate here instead of calling [`Self::keyword`].
    pub fn keywords_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Keyword> {
        self.keywords()
            .filter(move |k| k.name.eq_ignore_ascii_case(name))
    }
}

impl Keyword {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.nodes.iter().filter_map(Node::as_section)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.nodes.iter().filter_map(Node::as_keyword)
    }

    /// The first top-level section with the given name (case-insensitive).
    pub fn section(&self, name: &str) -> Option<&Section> {
        find_section(&self.nodes, name)
    }

    /// The first top-level keyword with the given name (case-insensitive).
    pub fn keyword(&self, name: &str) -> Option<&Keyword> {
        find_keyword(&self.nodes, name)
    }

    /// Looks up a nested section by a slash-separated path, e.g.
    /// `"FORCE_EVAL/DFT/SCF"`. Each step takes the first match,
    /// case-insensitively.
    pub fn get_section(&self, path: &str) -> Option<&Section> {
        let mut steps = path.split('/').filter(|s| !s.is_empty());
        let mut current = self.section(steps.next()?)?;
        for step in steps {
            current = current.section(step)?;
        }
        Some(current)
    }

    /// Looks up a keyword by a slash-separated path; the last step names the
    /// keyword, everything before it names sections.
    pub fn get_keyword(&self, path: &str) -> Option<&Keyword> {
        let (section_path, keyword_name) = path.rsplit_once('/')?;
        self.get_section(section_path)?.keyword(keyword_name)
    }

    /// Total number of section nodes in the whole tree.
    pub fn section_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .filter_map(Node::as_section)
                .map(|s| 1 + count(&s.children))
                .sum()
        }
        count(&self.nodes)
    }
}

fn find_section<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Section> {
    nodes
        .iter()
        .filter_map(Node::as_section)
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

fn find_keyword<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Keyword> {
    nodes
        .iter()
        .filter_map(Node::as_keyword)
        .find(|k| k.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let scf = Section::new("SCF");
        let mut dft = Section::new("DFT");
        dft.children.push(Node::Keyword(Keyword::new(
            "BASIS_SET_FILE_NAME",
            vec![Value::from("BASIS_MOLOPT")],
        )));
        dft.children.push(Node::Section(scf));
        let mut force_eval = Section::new("FORCE_EVAL");
        force_eval
            .children
            .push(Node::Keyword(Keyword::new("METHOD", vec![Value::from("Quickstep")])));
        force_eval.children.push(Node::Section(dft));
        Document::new(vec![Node::Section(force_eval)])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let doc = sample();
        assert!(doc.section("force_eval").is_some());
        assert!(doc.section("FORCE_EVAL").unwrap().keyword("method").is_some());
    }

    #[test]
    fn test_path_lookup() {
        let doc = sample();
        assert!(doc.get_section("FORCE_EVAL/DFT/SCF").is_some());
        assert!(doc.get_section("FORCE_EVAL/MM").is_none());
        let kw = doc.get_keyword("force_eval/dft/basis_set_file_name").unwrap();
        assert_eq!(kw.values[0], "BASIS_MOLOPT");
    }

    #[test]
    fn test_section_count() {
        assert_eq!(sample().section_count(), 3);
    }

    #[test]
    fn test_repeated_keywords_preserved_in_order() {
        let mut kind = Section::new("KIND").with_parameter("Na");
        kind.children
            .push(Node::Keyword(Keyword::new("BASIS_SET", vec![Value::from("DZVP")])));
        kind.children
            .push(Node::Keyword(Keyword::new("BASIS_SET", vec![Value::from("AUX")])));
        let doc = Document::new(vec![Node::Section(kind)]);

        let section = doc.section("kind").unwrap();
        let all: Vec<_> = section.keywords_named("basis_set").collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].values[0], "DZVP");
        assert_eq!(all[1].values[0], "AUX");
        // the single-lookup form returns the first occurrence
        assert_eq!(section.keyword("BASIS_SET").unwrap().values[0], "DZVP");
    }
}
