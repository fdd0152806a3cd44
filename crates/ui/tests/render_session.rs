use core_types::Viewport;
use dom::{Document, Event, MouseState, NodeId};
use input::Modifiers;
use protocol::{MouseKind, Request};
use serde_json::{Value, json};
use ui::{Session, ViewerConfig};

fn face(fg: &str, bg: &str) -> Value {
    json!({"fg": fg, "bg": bg, "attributes": []})
}

fn atom(fg: &str, text: &str) -> Value {
    json!({"face": face(fg, "default"), "contents": text})
}

fn line(text: &str) -> Value {
    json!([atom("default", text), atom("default", "\n")])
}

fn msg(method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "method": method, "params": params})
}

fn draw(lines: &[&str]) -> Value {
    let lines: Vec<Value> = lines.iter().map(|text| line(text)).collect();
    msg("draw", json!([lines, face("white", "black"), face("blue", "black")]))
}

fn draw_status(status: &str, mode: &str) -> Value {
    msg(
        "draw_status",
        json!([[atom("default", status)], [atom("cyan", mode)], face("white", "bright-green")]),
    )
}

fn menu_show(items: &[&str], anchor_line: u32, anchor_column: u32, style: &str) -> Value {
    let items: Vec<Value> = items.iter().map(|text| json!([atom("default", text)])).collect();
    msg(
        "menu_show",
        json!([
            items,
            {"line": anchor_line, "column": anchor_column},
            face("black", "yellow"),
            face("white", "blue"),
            style
        ]),
    )
}

fn frame(messages: &[Value]) -> String {
    Value::Array(messages.to_vec()).to_string()
}

fn session(rows: u32) -> Session {
    let config = ViewerConfig {
        rows,
        ..ViewerConfig::default()
    };
    let mut session = Session::new(&config);
    session.drain_requests();
    session
}

fn painted(lines: &[&str]) -> Session {
    let mut session = session(24);
    session
        .receive(&frame(&[draw(lines), draw_status("", "normal")]))
        .expect("frame");
    session.redraw().expect("pass");
    session
}

fn root(doc: &Document) -> NodeId {
    doc.root().expect("painted")
}

fn main_lines(doc: &Document) -> Vec<NodeId> {
    let main = doc.children(root(doc))[0];
    doc.children(main).to_vec()
}

fn content_block(doc: &Document, line: NodeId) -> NodeId {
    doc.children(line)[0]
}

fn content_inline(doc: &Document, line: NodeId) -> NodeId {
    doc.children(content_block(doc, line))[0]
}

/// (left column, right column) of the bottom bar.
fn bottom_bar(doc: &Document) -> (NodeId, NodeId) {
    let bar = doc.children(root(doc))[1];
    let columns = doc.children(bar);
    (columns[0], columns[1])
}

fn press(column: Option<u32>) -> Event {
    Event::new("mousedown").with_mouse(MouseState {
        buttons: 1,
        button: 0,
        column,
        ..MouseState::default()
    })
}

#[test]
fn initial_resize_is_queued() {
    let config = ViewerConfig::default();
    let mut session = Session::new(&config);
    assert_eq!(
        session.drain_outbox().expect("encode"),
        vec![r#"{"jsonrpc":"2.0","method":"resize","params":[24,80]}"#.to_string()]
    );
}

#[test]
fn nothing_renders_before_draw_and_status() {
    let mut session = session(24);
    session.receive(&frame(&[draw(&["hello"])])).expect("frame");
    session.redraw().expect("pass");
    assert_eq!(session.root(), None);
    assert_eq!(session.html(), "");

    session.receive(&frame(&[draw_status("", "normal")])).expect("frame");
    session.redraw().expect("pass");
    assert!(session.root().is_some());
}

#[test]
fn screen_layout_follows_the_editor() {
    let session = painted(&["fn main() {", "}"]);
    let doc = session.document();
    let root = root(doc);
    assert_eq!(doc.attribute(root, "id"), Some("root"));
    assert_eq!(doc.children(root).len(), 3);
    let style = doc.children(root)[2];
    assert_eq!(doc.tag(style), Some("style"));
    assert_eq!(doc.text_content(style), session.classes().sheet());

    let lines = main_lines(doc);
    assert_eq!(lines.len(), 2);
    assert_eq!(doc.attribute(lines[0], "class"), Some("line"));
    assert_eq!(doc.text_content(lines[0]), "fn main() { ");
    let inline = content_inline(doc, lines[0]);
    assert!(doc.attribute(inline, "class").is_some_and(|c| c.starts_with("content-inline ")));
    assert_eq!(doc.children(inline).len(), 2);
    for pre in doc.children(inline) {
        assert_eq!(doc.tag(*pre), Some("pre"));
        assert!(doc.attribute(*pre, "class").is_some());
    }

    let (left, right) = bottom_bar(doc);
    assert_eq!(doc.children(left).len(), 1);
    assert_eq!(doc.text_content(right), "normal");
}

#[test]
fn unchanged_frame_is_a_quiet_pass() {
    let mut session = painted(&["a", "b", "c"]);
    session
        .receive(&frame(&[draw(&["a", "b", "c"]), draw_status("", "normal")]))
        .expect("frame");
    let stats = session.redraw().expect("pass").expect("pending");
    assert!(stats.is_quiet(), "{stats}");
}

#[test]
fn changing_one_line_keeps_the_others() {
    let mut session = painted(&["a", "b", "c"]);
    let before = main_lines(session.document());
    let untouched = content_inline(session.document(), before[2]);

    session
        .receive(&frame(&[draw(&["a", "B", "c"]), draw_status("", "normal")]))
        .expect("frame");
    let stats = session.redraw().expect("pass").expect("pending");
    let doc = session.document();
    let after = main_lines(doc);
    assert_eq!(after, before);
    assert_eq!(content_inline(doc, after[2]), untouched);
    assert_eq!(doc.text_content(after[1]), "B ");
    assert_eq!(stats.texts_created, 1);
    assert_eq!(stats.elements_created, 0);
}

#[test]
fn messages_between_passes_coalesce() {
    let mut session = painted(&["a"]);
    let passes = session.scheduler().passes();
    session.receive(&frame(&[draw(&["b"])])).expect("frame");
    session.receive(&frame(&[draw(&["c"])])).expect("frame");
    assert!(session.redraw().expect("pass").is_some());
    assert!(session.redraw().expect("pass").is_none());
    assert_eq!(session.scheduler().passes(), passes + 1);
    assert!(session.html().contains(">c</pre>"));
}

#[test]
fn bad_frame_leaves_everything_untouched() {
    let mut session = painted(&["keep"]);
    let html = session.html();
    assert!(session.receive("[{\"method\":\"draw\",\"params\":[1]}]").is_err());
    assert!(session.redraw().expect("pass").is_none());
    assert_eq!(session.html(), html);
}

#[test]
fn pointer_on_text_reports_the_measured_column() {
    let mut session = painted(&["hello", "world"]);
    let doc = session.document();
    let second = main_lines(doc)[1];
    let pre = doc.children(content_inline(doc, second))[0];

    let mut event = press(Some(3));
    assert!(!session.dispatch(pre, &mut event));
    assert!(event.propagation_stopped());
    assert_eq!(
        session.drain_requests(),
        vec![Request::Mouse {
            kind: MouseKind::PressLeft,
            line: 1,
            column: 3
        }]
    );
}

#[test]
fn pointer_past_the_text_reports_the_line_end() {
    let mut session = painted(&["hello"]);
    let block = content_block(session.document(), main_lines(session.document())[0]);
    session.dispatch(block, &mut press(None));
    assert_eq!(
        session.drain_requests(),
        vec![Request::Mouse {
            kind: MouseKind::PressLeft,
            line: 0,
            column: 6
        }]
    );
}

#[test]
fn secondary_buttons_are_ignored() {
    let mut session = painted(&["hello"]);
    let inline = content_inline(session.document(), main_lines(session.document())[0]);
    let mut event = Event::new("mousedown").with_mouse(MouseState {
        buttons: 2,
        button: 2,
        column: Some(1),
        ..MouseState::default()
    });
    assert!(session.dispatch(inline, &mut event));
    assert!(session.drain_requests().is_empty());
}

#[test]
fn prompt_menu_is_limited_to_the_viewport() {
    let mut session = session(5);
    session
        .receive(&frame(&[
            draw(&["x"]),
            draw_status(":", "prompt"),
            menu_show(&["edit", "echo", "eval"], 0, 0, "prompt"),
            msg("menu_select", json!([1])),
        ]))
        .expect("frame");
    session.redraw().expect("pass");
    let doc = session.document();
    let (left, _) = bottom_bar(doc);
    let columns = doc.children(left);
    assert_eq!(columns.len(), 2);
    let menu = columns[0];
    let items = doc.children(menu);
    assert_eq!(items.len(), 2);
    assert_eq!(doc.text_content(items[0]), "edit");

    let first_pre = doc.children(content_inline(doc, items[0]))[0];
    let second_pre = doc.children(content_inline(doc, items[1]))[0];
    assert_ne!(doc.attribute(first_pre, "class"), doc.attribute(second_pre, "class"));

    session.receive(&frame(&[msg("menu_hide", json!([]))])).expect("frame");
    session.redraw().expect("pass");
    let (left, _) = bottom_bar(session.document());
    assert_eq!(session.document().children(left).len(), 1);
}

#[test]
fn inline_menu_hangs_under_its_anchor_line() {
    let mut session = session(24);
    session
        .receive(&frame(&[
            draw(&["let value = foo", "next"]),
            draw_status("", "insert"),
            menu_show(&["foo_bar", "foo_baz"], 0, 1, "inline"),
        ]))
        .expect("frame");
    session.redraw().expect("pass");
    let doc = session.document();
    let lines = main_lines(doc);
    let inline = content_inline(doc, lines[0]);
    let children = doc.children(inline);
    assert_eq!(children.len(), 3);
    let popup = children[2];
    assert_eq!(
        doc.attribute(popup, "style"),
        Some("position: absolute; top: 100%; left: 0%;")
    );
    assert_eq!(doc.text_content(popup), "foo_barfoo_baz");
    assert_eq!(doc.children(content_inline(doc, lines[1])).len(), 2);
}

#[test]
fn prompt_info_sits_next_to_the_mode_line() {
    let mut session = session(24);
    session
        .receive(&frame(&[
            draw(&["x"]),
            draw_status("", "normal"),
            msg(
                "info_show",
                json!(["", "press a key", {"line": 0, "column": 0}, face("black", "yellow"), "prompt"]),
            ),
        ]))
        .expect("frame");
    session.redraw().expect("pass");
    let doc = session.document();
    let (_, right) = bottom_bar(doc);
    let column = doc.children(right);
    assert_eq!(column.len(), 2);
    assert_eq!(doc.text_content(column[0]), "press a key");
    assert_eq!(doc.text_content(column[1]), "normal");
}

#[test]
fn keys_wheel_and_resize_are_queued_for_the_editor() {
    let mut session = session(24);
    assert!(session.key("Enter", Modifiers::NONE));
    assert!(!session.key("Shift", Modifiers::shift()));
    assert!(session.wheel(0.0, -1.0));
    assert!(!session.resize(Viewport::new(24, 80)));
    assert!(session.resize(Viewport::new(30, 100)));
    assert_eq!(session.state().viewport, Viewport::new(30, 100));
    assert_eq!(
        session.drain_outbox().expect("encode"),
        vec![
            r#"{"jsonrpc":"2.0","method":"keys","params":["<ret>"]}"#.to_string(),
            r#"{"jsonrpc":"2.0","method":"mouse","params":["wheel_up",0,0]}"#.to_string(),
            r#"{"jsonrpc":"2.0","method":"resize","params":[30,100]}"#.to_string(),
        ]
    );
}

#[test]
fn class_prefix_comes_from_configuration() {
    let config = ViewerConfig::from_toml_str("class_prefix = \"kv\"").expect("config");
    let mut session = Session::new(&config);
    session
        .receive(&frame(&[draw(&["x"]), draw_status("", "normal")]))
        .expect("frame");
    session.redraw().expect("pass");
    let doc = session.document();
    let bg = doc.attribute(root(doc), "class").expect("class");
    assert!(bg.split(' ').all(|name| name.starts_with("kv")), "{bg}");
}

fn class_names(doc: &Document, node: NodeId) -> Vec<String> {
    doc.attribute(node, "class")
        .unwrap_or_default()
        .split(' ')
        .map(str::to_string)
        .collect()
}

#[test]
fn reset_styles_repaints_with_classes_the_new_sheet_defines() {
    let mut session = painted(&["hello"]);
    let line = main_lines(session.document())[0];
    let pre = session.document().children(content_inline(session.document(), line))[0];
    let before = class_names(session.document(), pre);

    let mut colours = std::collections::BTreeMap::new();
    colours.insert("white".to_string(), "#eeeeee".to_string());
    session.reset_styles(ui::Theme::with_overrides(&colours));
    assert!(session.classes().sheet().is_empty());
    assert!(session.redraw().expect("pass").is_some());

    let doc = session.document();
    let sheet = session.classes().sheet();
    let line = main_lines(doc)[0];
    let inline = content_inline(doc, line);
    let pre = doc.children(inline)[0];
    assert_ne!(class_names(doc, pre), before);
    assert!(sheet.contains("#eeeeee"), "{sheet}");
    let generated = class_names(doc, pre)
        .into_iter()
        .chain(class_names(doc, inline).into_iter().skip(1))
        .chain(class_names(doc, root(doc)));
    for name in generated {
        assert!(sheet.contains(&format!(".{name} ")), "{name} missing from {sheet}");
    }
    let style = doc.children(root(doc))[2];
    assert_eq!(doc.text_content(style), sheet);
}
