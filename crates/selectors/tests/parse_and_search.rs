use css_selectors::{
    AttrRequirement, ElementAdapter, MatchCache, find, matches_part, parse_selector,
    parse_selector_list, parse_selector_part,
};

/// Tiny vector-backed tree for exercising the engine without an HTML parser.
#[derive(Default)]
struct TestTree {
    nodes: Vec<TestNode>,
}

struct TestNode {
    tag: Option<String>,
    attrs: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl TestTree {
    fn new() -> Self {
        let mut tree = Self::default();
        tree.nodes.push(TestNode {
            tag: None,
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        tree
    }

    fn element(&mut self, parent: usize, tag: &str, attrs: &[(&str, &str)]) -> usize {
        self.push(
            parent,
            Some(tag.to_owned()),
            attrs
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
        )
    }

    fn text(&mut self, parent: usize) -> usize {
        self.push(parent, None, Vec::new())
    }

    fn push(&mut self, parent: usize, tag: Option<String>, attrs: Vec<(String, String)>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TestNode {
            tag,
            attrs,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }
}

impl ElementAdapter for TestTree {
    type Handle = usize;

    fn unique_key(&self, node: usize) -> u64 {
        node as u64
    }

    fn is_element(&self, node: usize) -> bool {
        self.nodes[node].tag.is_some()
    }

    fn first_child(&self, node: usize) -> Option<usize> {
        self.nodes[node].children.first().copied()
    }

    fn next_sibling(&self, node: usize) -> Option<usize> {
        let parent = self.nodes[node].parent?;
        let siblings = &self.nodes[parent].children;
        let position = siblings.iter().position(|&sibling| sibling == node)?;
        siblings.get(position + 1).copied()
    }

    fn tag_name(&self, node: usize) -> &str {
        self.nodes[node].tag.as_deref().unwrap_or_default()
    }

    fn attr(&self, node: usize, name: &str) -> Option<&str> {
        self.nodes[node]
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[test]
fn compiles_tag_classes_id_and_attributes() {
    let part = parse_selector_part("a.title.main#link-1[rel=next][data-x]");
    assert_eq!(part.tag, "a");
    assert_eq!(part.classes, vec!["title".to_owned(), "main".to_owned()]);
    assert_eq!(part.id.as_deref(), Some("link-1"));
    assert_eq!(
        part.attrs.get("rel"),
        Some(&AttrRequirement::Equals("next".to_owned()))
    );
    assert_eq!(part.attrs.get("data-x"), Some(&AttrRequirement::Exists));
}

#[test]
fn quoted_and_empty_attribute_values() {
    let part = parse_selector_part("a[data-e-disable-page-transition='true'][title=\"\"]");
    assert_eq!(
        part.attrs.get("data-e-disable-page-transition"),
        Some(&AttrRequirement::Equals("true".to_owned()))
    );
    assert_eq!(part.attrs.get("title"), Some(&AttrRequirement::Exists));
}

#[test]
fn class_after_id_is_kept() {
    let part = parse_selector_part("div#main.content");
    assert_eq!(part.tag, "div");
    assert_eq!(part.id.as_deref(), Some("main"));
    assert_eq!(part.classes, vec!["content".to_owned()]);
}

#[test]
fn unterminated_bracket_stops_attribute_extraction() {
    let part = parse_selector_part("a[href=x][rel");
    assert_eq!(
        part.attrs.get("href"),
        Some(&AttrRequirement::Equals("x".to_owned()))
    );
    assert!(!part.attrs.contains_key("rel"));
    assert_eq!(part.tag, "a[rel");
}

#[test]
fn universal_and_empty_parts() {
    assert!(parse_selector_part("*").is_universal());
    assert!(parse_selector_part(".").is_universal());
    assert!(parse_selector("").is_empty());
    assert!(parse_selector_list("").is_empty());
    assert!(parse_selector_list(" , ,").selectors.is_empty());
}

#[test]
fn list_splits_on_commas_and_whitespace() {
    let list = parse_selector_list("article.post h5 a ,  .item-list .title a");
    assert_eq!(list.selectors.len(), 2);
    assert_eq!(list.selectors[0].parts.len(), 3);
    assert_eq!(list.selectors[1].parts.len(), 3);
    assert_eq!(list.selectors[1].parts[0].classes, vec!["item-list".to_owned()]);
}

#[test]
fn matcher_checks_every_constraint() {
    let mut tree = TestTree::new();
    let link = tree.element(0, "a", &[("class", "btn  primary"), ("id", "go"), ("href", "")]);
    let text = tree.text(link);

    assert!(matches_part(&tree, link, &parse_selector_part("a.primary.btn")));
    assert!(matches_part(&tree, link, &parse_selector_part("#go[href]")));
    assert!(!matches_part(&tree, link, &parse_selector_part("a.secondary")));
    assert!(!matches_part(&tree, link, &parse_selector_part("span.btn")));
    assert!(!matches_part(&tree, link, &parse_selector_part("a#stop")));
    assert!(!matches_part(&tree, link, &parse_selector_part("a[href=x]")));
    assert!(!matches_part(&tree, text, &parse_selector_part("*")));
}

#[test]
fn descendant_chain_keeps_duplicates() {
    // <div><div><div></div></div></div>
    let mut tree = TestTree::new();
    let outer = tree.element(0, "div", &[]);
    let middle = tree.element(outer, "div", &[]);
    let inner = tree.element(middle, "div", &[]);

    let found = find(&tree, 0, &parse_selector_list("div div"));
    assert_eq!(found, vec![middle, inner, inner]);
}

#[test]
fn chain_results_follow_document_order_of_each_scope() {
    // <div><p/><div><p/></div></div><p/>
    let mut tree = TestTree::new();
    let outer = tree.element(0, "div", &[]);
    let first = tree.element(outer, "p", &[]);
    let inner = tree.element(outer, "div", &[]);
    let second = tree.element(inner, "p", &[]);
    tree.element(0, "p", &[]);

    let found = find(&tree, 0, &parse_selector_list("div p"));
    assert_eq!(found, vec![first, second, second]);
}

#[test]
fn very_deep_trees_are_searched_without_recursion() {
    const DEPTH: usize = 100_000;
    let mut tree = TestTree::new();
    let body = tree.element(0, "body", &[]);
    let mut parent = body;
    for _ in 0..DEPTH {
        parent = tree.element(parent, "div", &[]);
    }
    let target = tree.element(parent, "span", &[("class", "t")]);

    assert_eq!(find(&tree, 0, &parse_selector_list("span.t")), vec![target]);
    assert_eq!(find(&tree, 0, &parse_selector_list("body span.t")), vec![target]);
    assert_eq!(find(&tree, body, &parse_selector_list("div")).len(), DEPTH);
}

#[test]
fn alternatives_are_concatenated_in_list_order() {
    let mut tree = TestTree::new();
    let first = tree.element(0, "p", &[]);
    let second = tree.element(0, "span", &[]);
    let third = tree.element(0, "p", &[]);

    let found = find(&tree, 0, &parse_selector_list("span, p"));
    assert_eq!(found, vec![second, first, third]);

    let doubled = find(&tree, 0, &parse_selector_list("p, p"));
    assert_eq!(doubled, vec![first, third, first, third]);
}

#[test]
fn search_root_is_a_candidate() {
    let mut tree = TestTree::new();
    let section = tree.element(0, "section", &[]);
    let nested = tree.element(section, "section", &[]);

    assert_eq!(find(&tree, section, &parse_selector_list("section")), vec![section, nested]);
    assert!(find(&tree, nested, &parse_selector_list("p")).is_empty());
}

#[test]
fn cache_round_trip() {
    let mut cache = MatchCache::default();
    assert!(cache.is_empty());
    cache.set(7, 1, true);
    assert_eq!(cache.get(7, 1), Some(true));
    assert_eq!(cache.get(7, 0), None);
    assert_eq!(cache.len(), 1);
    cache.clear();
    assert!(cache.is_empty());
}
