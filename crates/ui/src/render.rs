//! Viewer state to descriptor tree.
//!
//! ```text
//! #root                       padding background, full viewport
//! ├── #main                   one .line per buffer line
//! │   └── .line > .content-block > .content-inline > pre (one per atom)
//! ├── bottom bar
//! │   ├── left: prompt menu, status line
//! │   └── right: prompt info, mode line
//! └── <style>                 generated classes
//! ```

use crate::outbox::Outbox;
use crate::state::ViewerState;
use crate::theme::Theme;
use core_types::CellPos;
use css::ClassCache;
use dom::{Attr, BuildError, Child, Descriptor, Event, cls, div, id, on, pre, style, thunk};
use input::{PointerPhase, pointer_request};
use protocol::{Atom, Face, Info, InfoStyle, Menu, MenuStyle, line_len};

pub const ROOT: &str = "root";
pub const MAIN: &str = "main";
pub const LINE: &str = "line";
pub const CONTENT_BLOCK: &str = "content-block";
pub const CONTENT_INLINE: &str = "content-inline";

const GLOBAL_CSS: &str = "
    pre {
      margin: 0;
    }
    pre, body {
      font-size: 22px;
      font-family: 'Consolas';
      letter-spacing: -0.025em;
    }
    body {
      margin: 0;
      overflow: hidden;
    }
";

/// Positioning classes shared by every pass.
#[derive(Clone, Debug)]
pub struct Layout {
    pub left: Attr,
    pub right: Attr,
    pub flex_column_right: Attr,
    pub flex_column_left: Attr,
    pub inline_flex_row_top: Attr,
    pub flex_row_top: Attr,
    pub wide_children: Attr,
}

impl Layout {
    /// Registers the layout classes and the page-wide rules in `classes`.
    pub fn new(classes: &mut ClassCache) -> Self {
        let layout = Self {
            left: classes.css("position: absolute; left: 0; bottom: 0;"),
            right: classes.css("position: absolute; right: 0; bottom: 0;"),
            flex_column_right: classes
                .css("display: flex; flex-direction: column; align-items: flex-end;"),
            flex_column_left: classes
                .css("display: flex; flex-direction: column; align-items: flex-start;"),
            inline_flex_row_top: classes
                .css("display: inline-flex; flex-direction: row; align-items: flex-start;"),
            flex_row_top: classes.css("display: flex; flex-direction: row; align-items: flex-start;"),
            wide_children: classes.css("& * {\n  width: 100%;\n}"),
        };
        classes.css(GLOBAL_CSS);
        layout
    }
}

/// Where a pointer handler takes its column from.
#[derive(Clone, Copy, Debug)]
enum ColumnSource {
    /// Past the end of the text: the line length.
    EndOfLine(u32),
    /// The cell the host measured under the pointer.
    Pointer,
}

const MOUSE: [(&str, PointerPhase); 3] = [
    ("mousedown", PointerPhase::Press),
    ("mousemove", PointerPhase::Move),
    ("mouseup", PointerPhase::Release),
];

fn mouse_handlers(line: Option<u32>, source: ColumnSource, outbox: &Outbox) -> Vec<Child> {
    let Some(line) = line else {
        return Vec::new();
    };
    MOUSE
        .iter()
        .map(|&(event_type, phase)| {
            let outbox = outbox.clone();
            Child::from(on(event_type, move |e: &mut Event| {
                let Some(mouse) = e.mouse else {
                    return;
                };
                let column = match source {
                    ColumnSource::EndOfLine(len) => len,
                    ColumnSource::Pointer => mouse.column.unwrap_or(0),
                };
                let pos = CellPos { line, column };
                let Some(request) = pointer_request(phase, mouse.buttons, mouse.button, pos) else {
                    return;
                };
                e.prevent_default();
                e.stop_propagation();
                outbox.push(request);
            }))
        })
        .collect()
}

struct Cell {
    class: Attr,
    text: String,
}

/// A line with its face classes already resolved.
struct LineModel {
    cells: Vec<Cell>,
    line: Option<u32>,
    len: u32,
}

impl LineModel {
    fn into_descriptor(self, inline_flex: Attr, outbox: &Outbox, inline_extra: Vec<Child>) -> Descriptor {
        let pres = self
            .cells
            .into_iter()
            .map(|cell| pre![cell.class, cell.text])
            .collect::<Vec<_>>();
        div![
            cls(LINE),
            div![
                cls(CONTENT_BLOCK),
                mouse_handlers(self.line, ColumnSource::EndOfLine(self.len), outbox),
                div![
                    cls(CONTENT_INLINE),
                    inline_flex,
                    mouse_handlers(self.line, ColumnSource::Pointer, outbox),
                    pres,
                    inline_extra,
                ],
            ],
        ]
    }
}

fn face_css(theme: &Theme, face: &Face, default: Option<&Face>) -> String {
    let mut fg = theme.resolve(&face.fg, default.map(|d| d.fg.as_str()));
    let mut bg = theme.resolve(&face.bg, default.map(|d| d.bg.as_str()));
    if face.has_attribute("reverse") {
        std::mem::swap(&mut fg, &mut bg);
    }
    let mut css = format!("color:{fg};background:{bg}");
    if face.has_attribute("bold") {
        css.push_str(";font-weight:bold");
    }
    if face.has_attribute("italic") {
        css.push_str(";font-style:italic");
    }
    if face.has_attribute("underline") {
        css.push_str(";text-decoration:underline");
    }
    if face.has_attribute("dim") {
        css.push_str(";opacity:0.7");
    }
    css
}

fn inline_menu_offset(anchor_column: i64, len: u32) -> f64 {
    if len <= 1 {
        return 0.0;
    }
    (anchor_column as f64 - 1.0) / (f64::from(len) - 1.0) * 100.0
}

/// Builds one pass worth of descriptors.
pub struct Painter<'a> {
    classes: &'a mut ClassCache,
    theme: &'a Theme,
    layout: &'a Layout,
    outbox: &'a Outbox,
}

impl<'a> Painter<'a> {
    pub fn new(classes: &'a mut ClassCache, theme: &'a Theme, layout: &'a Layout, outbox: &'a Outbox) -> Self {
        Self {
            classes,
            theme,
            layout,
            outbox,
        }
    }

    fn bg(&mut self, face: &Face) -> Attr {
        let theme = self.theme;
        self.classes.generate_class(&format!("bg:{}", face.bg), || {
            format!("background: {}", theme.resolve(&face.bg, Some("white")))
        })
    }

    fn face_class(&mut self, face: &Face, default: Option<&Face>) -> Result<Attr, BuildError> {
        let key = serde_json::to_string(&(face, default))?;
        let theme = self.theme;
        Ok(self.classes.generate_class(&key, || face_css(theme, face, default)))
    }

    fn markup(&mut self, atoms: &[Atom], default: &Face, line: Option<u32>) -> Result<LineModel, BuildError> {
        let blank = atoms.iter().all(|atom| atom.contents.is_empty());
        let mut cells = Vec::with_capacity(atoms.len().max(1));
        if atoms.is_empty() {
            let face = Face::new("default", "default");
            cells.push(Cell {
                class: self.face_class(&face, Some(default))?,
                text: " ".to_string(),
            });
        }
        for (i, atom) in atoms.iter().enumerate() {
            // A line without text still occupies one cell.
            let text = if blank && i + 1 == atoms.len() {
                " ".to_string()
            } else {
                atom.contents.replace('\n', " ")
            };
            cells.push(Cell {
                class: self.face_class(&atom.face, Some(default))?,
                text,
            });
        }
        let len = if blank { 1 } else { line_len(atoms) };
        Ok(LineModel {
            cells,
            line,
            len: u32::try_from(len).unwrap_or(u32::MAX),
        })
    }

    fn info_box(&mut self, info: &Info) -> Result<Descriptor, BuildError> {
        Ok(div![
            self.classes.css("padding: 6px"),
            self.face_class(&info.face, None)?,
            pre![info.content.to_plain()],
        ])
    }

    fn menu_items(&mut self, menu: &Menu, state: &ViewerState) -> Result<Vec<Descriptor>, BuildError> {
        let inline_flex = self.layout.inline_flex_row_top.clone();
        let mut items = Vec::new();
        for (i, item) in menu.items.iter().take(state.menu_capacity()).enumerate() {
            let face = if state.selected == Some(i) {
                &menu.selected_face
            } else {
                &menu.face
            };
            let model = self.markup(item, face, None)?;
            items.push(model.into_descriptor(inline_flex.clone(), self.outbox, Vec::new()));
        }
        Ok(items)
    }

    /// The whole screen, or `None` until both the buffer and the status line
    /// have been received.
    pub fn screen(&mut self, state: &ViewerState) -> Result<Option<Descriptor>, BuildError> {
        let (Some(draw), Some(status)) = (&state.main, &state.status) else {
            return Ok(None);
        };
        let layout = self.layout;

        let mut info_prompt = None;
        let mut info_inline = None;
        if let Some(info) = &state.info {
            let dom = self.info_box(info)?;
            match &info.style {
                InfoStyle::Prompt => info_prompt = Some(dom),
                InfoStyle::MenuDoc => info_inline = Some(dom),
                InfoStyle::Other(other) => {
                    log::warn!(target: "ui.render", "unsupported info style {other:?}")
                }
            }
        }

        let mut menu_prompt = None;
        let mut menu_inline = None;
        if let Some(menu) = &state.menu {
            let items = self.menu_items(menu, state)?;
            match &menu.style {
                MenuStyle::Prompt | MenuStyle::Search => {
                    menu_prompt = Some(div![
                        layout.wide_children.clone(),
                        self.classes.css("display: inline-block"),
                        self.bg(&menu.face),
                        items,
                    ]);
                }
                MenuStyle::Inline => {
                    menu_inline = usize::try_from(menu.anchor.line).ok().map(|line| (line, menu, items));
                }
                MenuStyle::Other(other) => {
                    log::warn!(target: "ui.render", "unsupported menu style {other:?}")
                }
            }
        }

        let mut lines = Vec::with_capacity(draw.lines.len());
        for (i, atoms) in draw.lines.iter().enumerate() {
            let index = u32::try_from(i).unwrap_or(u32::MAX);
            let model = self.markup(atoms, &draw.default_face, Some(index))?;
            let inline_flex = layout.inline_flex_row_top.clone();
            match menu_inline.take_if(|(line, _, _)| *line == i) {
                Some((_, menu, items)) => {
                    let left = inline_menu_offset(menu.anchor.column, model.len);
                    let extra = vec![
                        Child::from(self.classes.css("position: relative")),
                        Child::from(div![
                            layout.flex_row_top.clone(),
                            div![
                                layout.wide_children.clone(),
                                items,
                                self.bg(&menu.face),
                                self.classes.css("margin-right: 6px;"),
                            ],
                            div![info_inline.take()],
                            self.classes.css("z-index: 3"),
                            style(format!("position: absolute; top: 100%; left: {left}%;")),
                        ]),
                    ];
                    lines.push(model.into_descriptor(inline_flex, self.outbox, extra));
                }
                None => {
                    let outbox = self.outbox.clone();
                    let key = (self.classes.epoch(), index, atoms, &draw.default_face);
                    lines.push(thunk(&key, move || {
                        model.into_descriptor(inline_flex, &outbox, Vec::new())
                    })?);
                }
            }
        }
        let main = div![id(MAIN), self.bg(&draw.default_face), lines];

        let inline_flex = layout.inline_flex_row_top.clone();
        let status_line = self.markup(&status.status_line, &status.default_face, None)?;
        let status_dom = div![status_line.into_descriptor(inline_flex.clone(), self.outbox, Vec::new())];
        let mode_line = self.markup(&status.mode_line, &status.default_face, None)?;
        let mode_dom = div![mode_line.into_descriptor(inline_flex, self.outbox, Vec::new())];

        let root = div![
            id(ROOT),
            self.bg(&draw.padding_face),
            self.classes.css("height: 100vh; width: 100vw; overflow: hidden;"),
            main,
            div![
                layout.left.clone(),
                self.classes.css("width: 100vw"),
                div![
                    layout.left.clone(),
                    layout.flex_column_left.clone(),
                    self.classes.css("z-index: 3"),
                    menu_prompt,
                    status_dom,
                ],
                div![
                    layout.right.clone(),
                    layout.flex_column_right.clone(),
                    self.classes.css("z-index: 2"),
                    info_prompt,
                    mode_dom,
                ],
            ],
            self.classes.sheet_descriptor()?,
        ];
        Ok(Some(root))
    }
}
