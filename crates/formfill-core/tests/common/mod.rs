//! In-memory fixture documents for the integration tests

#![allow(dead_code)]

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// Ff bits used by the fixtures
pub const FF_RADIO: i64 = 1 << 15;
pub const FF_PUSHBUTTON: i64 = 1 << 16;
pub const FF_COMBO: i64 = 1 << 17;
pub const FF_EDIT: i64 = 1 << 18;

/// Builds a one-page document with an AcroForm
///
/// Every widget is placed on page 0 through both `/P` and the page's
/// `/Annots`.
pub struct FormBuilder {
    doc: Document,
    pages_id: ObjectId,
    page_id: ObjectId,
    fields: Vec<Object>,
    annots: Vec<Object>,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_id,
            fields: Vec::new(),
            annots: Vec::new(),
        }
    }

    /// Text field merged with its widget
    pub fn text(self, name: &str, value: &str, rect: [i64; 4]) -> Self {
        let mut dict = dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal(name),
        };
        if !value.is_empty() {
            dict.set("V", Object::string_literal(value));
        }
        self.widget_field(dict, rect)
    }

    /// Text field limited to `max_len` characters
    pub fn text_with_max_len(self, name: &str, max_len: i64) -> Self {
        let dict = dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal(name),
            "MaxLen" => max_len,
        };
        self.widget_field(dict, [50, 600, 150, 620])
    }

    /// Checkbox with an on-state named `Yes`
    pub fn checkbox(mut self, name: &str, checked: bool) -> Self {
        let state = if checked { "Yes" } else { "Off" };
        let appearance = self.appearance_states(&[b"Yes".as_slice()]);
        let dict = dictionary! {
            "FT" => "Btn",
            "T" => Object::string_literal(name),
            "V" => Object::Name(state.as_bytes().to_vec()),
            "AS" => Object::Name(state.as_bytes().to_vec()),
            "AP" => dictionary! { "N" => appearance },
        };
        self.widget_field(dict, [50, 500, 64, 514])
    }

    /// Radio group with one widget per state
    pub fn radio(self, name: &str, states: &[&str], selected: Option<&str>) -> Self {
        let states: Vec<&[u8]> = states.iter().map(|s| s.as_bytes()).collect();
        self.radio_with_states(name, &states, selected.map(str::as_bytes))
    }

    /// Radio group whose state names are raw name bytes
    pub fn radio_with_states(
        self,
        name: &str,
        states: &[&[u8]],
        selected: Option<&[u8]>,
    ) -> Self {
        let parent = dictionary! {
            "FT" => "Btn",
            "Ff" => FF_RADIO,
            "T" => Object::string_literal(name),
        };
        self.radio_group(parent, states, selected)
    }

    /// Radio group with `/Opt` export values and widget states `0`, `1`, ...
    pub fn radio_with_export_values(
        self,
        name: &str,
        export_values: &[&str],
        selected: Option<usize>,
    ) -> Self {
        let indices: Vec<String> = (0..export_values.len()).map(|i| i.to_string()).collect();
        let states: Vec<&[u8]> = indices.iter().map(|s| s.as_bytes()).collect();
        let parent = dictionary! {
            "FT" => "Btn",
            "Ff" => FF_RADIO,
            "T" => Object::string_literal(name),
            "Opt" => export_values
                .iter()
                .map(|v| Object::string_literal(*v))
                .collect::<Vec<_>>(),
        };
        let selected = selected.map(|i| states[i]);
        self.radio_group(parent, &states, selected)
    }

    fn radio_group(mut self, mut parent: Dictionary, states: &[&[u8]], selected: Option<&[u8]>) -> Self {
        let parent_id = self.doc.new_object_id();
        let mut kids = Vec::new();
        for (i, state) in states.iter().enumerate() {
            let appearance = self.appearance_states(&[*state]);
            let current: &[u8] = if selected == Some(*state) { *state } else { b"Off" };
            let x = 50 + 20 * i as i64;
            let widget = self.place_widget(dictionary! {
                "Parent" => parent_id,
                "AS" => Object::Name(current.to_vec()),
                "AP" => dictionary! { "N" => appearance },
            }, [x, 400, x + 14, 414]);
            kids.push(Object::Reference(widget));
        }

        parent.set("Kids", kids);
        if let Some(selected) = selected {
            parent.set("V", Object::Name(selected.to_vec()));
        }
        self.doc.objects.insert(parent_id, Object::Dictionary(parent));
        self.fields.push(Object::Reference(parent_id));
        self
    }

    /// Radio group whose widgets carry no appearance states
    pub fn radio_without_options(mut self, name: &str) -> Self {
        let parent_id = self.doc.new_object_id();
        let widget = self.place_widget(
            dictionary! { "Parent" => parent_id },
            [50, 300, 64, 314],
        );
        self.doc.objects.insert(
            parent_id,
            Object::Dictionary(dictionary! {
                "FT" => "Btn",
                "Ff" => FF_RADIO,
                "T" => Object::string_literal(name),
                "Kids" => vec![Object::Reference(widget)],
            }),
        );
        self.fields.push(Object::Reference(parent_id));
        self
    }

    /// Combo box with plain string options
    pub fn dropdown(self, name: &str, options: &[&str], selected: Option<&str>) -> Self {
        let mut dict = dictionary! {
            "FT" => "Ch",
            "Ff" => FF_COMBO,
            "T" => Object::string_literal(name),
            "Opt" => options
                .iter()
                .map(|o| Object::string_literal(*o))
                .collect::<Vec<_>>(),
        };
        if let Some(selected) = selected {
            dict.set("V", Object::string_literal(selected));
        }
        self.widget_field(dict, [50, 200, 200, 220])
    }

    /// Combo box whose `/Opt` holds `[export display]` pairs
    pub fn choice_with_pairs(
        self,
        name: &str,
        pairs: &[(&str, &str)],
        selected_export: Option<&str>,
    ) -> Self {
        let mut dict = dictionary! {
            "FT" => "Ch",
            "Ff" => FF_COMBO,
            "T" => Object::string_literal(name),
            "Opt" => pairs
                .iter()
                .map(|(export, display)| {
                    Object::Array(vec![
                        Object::string_literal(*export),
                        Object::string_literal(*display),
                    ])
                })
                .collect::<Vec<_>>(),
        };
        if let Some(selected) = selected_export {
            dict.set("V", Object::string_literal(selected));
        }
        self.widget_field(dict, [50, 240, 200, 260])
    }

    /// Combo box that also accepts values outside its options
    pub fn editable_combo(self, name: &str, options: &[&str]) -> Self {
        let dict = dictionary! {
            "FT" => "Ch",
            "Ff" => FF_COMBO | FF_EDIT,
            "T" => Object::string_literal(name),
            "Opt" => options
                .iter()
                .map(|o| Object::string_literal(*o))
                .collect::<Vec<_>>(),
        };
        self.widget_field(dict, [50, 160, 200, 180])
    }

    /// Choice field without the combo flag
    pub fn list_box(self, name: &str, options: &[&str], selected: Option<&str>) -> Self {
        let mut dict = dictionary! {
            "FT" => "Ch",
            "T" => Object::string_literal(name),
            "Opt" => options
                .iter()
                .map(|o| Object::string_literal(*o))
                .collect::<Vec<_>>(),
        };
        if let Some(selected) = selected {
            dict.set("V", Object::string_literal(selected));
        }
        self.widget_field(dict, [50, 100, 200, 150])
    }

    /// Field without `/FT` holding a string value
    pub fn typeless(self, name: &str, value: &str) -> Self {
        let dict = dictionary! {
            "T" => Object::string_literal(name),
            "V" => Object::string_literal(value),
        };
        self.widget_field(dict, [300, 700, 500, 720])
    }

    pub fn push_button(self, name: &str) -> Self {
        let dict = dictionary! {
            "FT" => "Btn",
            "Ff" => FF_PUSHBUTTON,
            "T" => Object::string_literal(name),
        };
        self.widget_field(dict, [300, 50, 380, 70])
    }

    /// A `/Fields` entry pointing at an object that does not exist
    pub fn dangling(mut self) -> Self {
        self.fields.push(Object::Reference((9999, 0)));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.doc.objects.insert(
            self.page_id,
            Object::Dictionary(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Annots" => self.annots,
            }),
        );
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(self.page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
            "AcroForm" => dictionary! { "Fields" => self.fields },
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn widget_field(mut self, dict: Dictionary, rect: [i64; 4]) -> Self {
        let id = self.place_widget(dict, rect);
        self.fields.push(Object::Reference(id));
        self
    }

    fn place_widget(&mut self, mut dict: Dictionary, rect: [i64; 4]) -> ObjectId {
        dict.set("Type", "Annot");
        dict.set("Subtype", "Widget");
        dict.set("Rect", rect.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>());
        dict.set("P", self.page_id);
        let id = self.doc.add_object(dict);
        self.annots.push(Object::Reference(id));
        id
    }

    /// `/AP /N` dictionary with the given on-states plus `Off`
    fn appearance_states(&mut self, on_states: &[&[u8]]) -> Dictionary {
        let mut states = Dictionary::new();
        for state in on_states.iter().copied().chain(std::iter::once(b"Off".as_slice())) {
            let stream = self
                .doc
                .add_object(Object::Stream(Stream::new(Dictionary::new(), Vec::new())));
            states.set(state.to_vec(), stream);
        }
        states
    }
}

/// Read `/AcroForm /NeedAppearances` from serialized bytes
pub fn need_appearances(bytes: &[u8]) -> bool {
    let doc = Document::load_mem(bytes).unwrap();
    let root = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    doc.get_object(root)
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"AcroForm")
        .and_then(|form| form.as_dict())
        .and_then(|form| form.get(b"NeedAppearances"))
        .map(|flag| matches!(flag, Object::Boolean(true)))
        .unwrap_or(false)
}

/// Raw `/V` string of the field whose `/T` is `name`
pub fn field_value(bytes: &[u8], name: &str) -> Option<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.objects.values().find_map(|object| {
        let dict = object.as_dict().ok()?;
        match (dict.get(b"T").ok()?, dict.get(b"V").ok()?) {
            (Object::String(t, _), Object::String(v, _)) if t.as_slice() == name.as_bytes() => {
                Some(String::from_utf8_lossy(v).into_owned())
            }
            _ => None,
        }
    })
}
