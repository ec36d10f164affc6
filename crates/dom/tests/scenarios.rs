use html_dom::{parse, parse_fragment, DomError, Namespace, NodeKind, TagCode, Tree};

const S1: &str = "<html><head><title>T</title></head><body><p>Hi</p></body></html>";

#[test]
fn test_document_skeleton_lookups() {
    let tree = parse(S1).unwrap();
    assert_eq!(tree.root().kind(), NodeKind::Document);

    let html = tree.document_element().unwrap();
    assert_eq!(html.tag_code(), TagCode::Html);

    let head = tree.head().unwrap();
    assert_eq!(head.first_child().unwrap().tag_code(), TagCode::Title);

    let body = tree.body().unwrap();
    let p = body.first_child().unwrap();
    assert_eq!(p.tag_code(), TagCode::P);
    assert_eq!(p.inner_text(), "Hi");
}

#[test]
fn test_void_children_in_fragment() {
    let mut tree = parse_fragment("<div><br><img src='a'></div>", TagCode::Div, Namespace::Html).unwrap();
    let div = tree.root().first_child().unwrap();
    assert_eq!(div.tag_code(), TagCode::Div);

    let children: Vec<_> = div.children().collect();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| c.is_void_element()));
    let (br, img) = (children[0], children[1]);
    assert_eq!(br.tag_code(), TagCode::Br);
    assert_eq!(img.attribute("src"), Some("a"));

    let (br, img) = (br.id(), img.id());
    let err = tree.append_child(img, br).unwrap_err();
    assert!(matches!(err, DomError::VoidElementChild(id) if id == img));
    // Rejected insertion left the structure alone.
    assert_eq!(tree.node(br).unwrap().next_sibling().unwrap().id(), img);
}

#[test]
fn test_attribute_order_and_removal() {
    let mut tree = parse("<a href='/x' class='y'>z</a>").unwrap();
    let a = tree.nodes_by_tag_code(TagCode::A).first().unwrap();
    let keys: Vec<_> = a.attributes().map(|attr| attr.key()).collect();
    assert_eq!(keys, vec!["href", "class"]);

    let id = a.id();
    let mut a = tree.node_mut(id).unwrap();
    assert!(a.remove_attribute("href").unwrap());
    assert!(!a.remove_attribute("href").unwrap());

    let a = tree.node(id).unwrap();
    assert_eq!(a.attribute("href"), None);
    assert_eq!(a.html(), r#"<a class="y">z</a>"#);
}

#[test]
fn test_script_text_is_verbatim() {
    let tree = parse("<script>if (a<b) x;</script>").unwrap();
    let script = tree.nodes_by_tag_code(TagCode::Script).first().unwrap();
    assert_eq!(script.parent().unwrap().tag_code(), TagCode::Head);
    assert_eq!(script.inner_text(), "if (a<b) x;");
    assert!(tree.serialize().contains("<script>if (a<b) x;</script>"));
}

#[test]
fn test_implied_list_item_ends() {
    let tree = parse("<ul><li>1<li>2<li>3</ul>").unwrap();
    let ul = tree.nodes_by_tag_code(TagCode::Ul).first().unwrap();
    let items: Vec<_> = ul.children().collect();
    assert_eq!(items.len(), 3);
    for (i, li) in items.iter().enumerate() {
        assert_eq!(li.tag_code(), TagCode::Li);
        assert_eq!(li.inner_text(), (i + 1).to_string());
    }
    assert_eq!(tree.nodes_by_tag_code(TagCode::Li).len(), 3);
}

#[test]
fn test_removing_head() {
    let mut tree = parse(S1).unwrap();
    let head = tree.head().unwrap().id();
    tree.remove_from_parent(head).unwrap();

    let names: Vec<_> = tree
        .document_element()
        .unwrap()
        .children()
        .map(|n| n.tag_code())
        .collect();
    assert_eq!(names, vec![TagCode::Body]);
    assert!(tree.head().is_none());

    let html = tree.serialize();
    assert!(!html.contains("<head>"));
    assert!(!html.contains("<title>"));
    assert_eq!(html, "<html><body><p>Hi</p></body></html>");

    // Detached, not destroyed
    assert_eq!(tree.node(head).unwrap().first_child().unwrap().tag_code(), TagCode::Title);
}

#[test]
fn test_building_a_document_by_hand() {
    let mut tree = Tree::new_document();
    let root = tree.root_id();
    let doctype = tree.create_doctype("html").unwrap();
    let html = tree.create_element("html").unwrap();
    let body = tree.create_element("body").unwrap();
    let p = tree.create_element("p").unwrap();
    tree.append_child(root, doctype).unwrap();
    tree.append_child(root, html).unwrap();
    tree.append_child(html, body).unwrap();
    tree.append_child(body, p).unwrap();
    tree.append_text(p, "a < b").unwrap();
    tree.node_mut(p).unwrap().set_attribute("title", "\"q\" & r").unwrap();

    assert_eq!(tree.body().unwrap().id(), body);
    assert!(tree.head().is_none());
    assert_eq!(
        tree.serialize(),
        r#"<!DOCTYPE html><html><body><p title="&quot;q&quot; &amp; r">a &lt; b</p></body></html>"#
    );
}

#[test]
fn test_destroyed_nodes_are_gone() {
    let mut tree = parse(S1).unwrap();
    let p = tree.nodes_by_tag_code(TagCode::P).ids()[0];
    let text = tree.node(p).unwrap().first_child().unwrap().id();
    let before = tree.len();

    tree.destroy(p).unwrap();
    assert!(tree.node(p).is_none());
    assert!(tree.node(text).is_none());
    assert_eq!(tree.len(), before - 2);
    assert!(matches!(tree.node_mut(p), Err(DomError::NodeNotFound(_))));
    assert!(tree.nodes_by_tag_code(TagCode::P).is_empty());
}
