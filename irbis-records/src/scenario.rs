//! Search scenario descriptors read from workstation INI files.

use crate::ini::IniFile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One search attribute of a database: how an entry point in the search
/// form maps onto dictionary prefixes, menus and display formats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchScenario {
    /// Display name of the attribute (author, inventory number).
    pub name: String,
    /// Prefix of the matching dictionary terms, possibly empty.
    pub prefix: String,
    /// Dictionary type for the attribute.
    pub dictionary_type: i32,
    /// Reference menu file name.
    pub menu_name: String,
    /// Dictionary correction mode.
    pub correction: String,
    /// Initial state of the truncation switch.
    pub truncation: String,
    /// Hint or warning text.
    pub hint: String,
    /// Reserved by the server, carried through verbatim.
    pub mod_by_dic_auto: String,
    /// Applicable logical operators.
    pub logic: String,
    /// Automatic search expansion rules (authority file or thesaurus).
    pub advance: String,
    /// Display format name.
    pub format: String,
}

impl SearchScenario {
    /// Decodes the `SEARCH` section of a workstation INI file.
    ///
    /// `ItemNumb` gives the scenario count; the remaining keys are
    /// indexed `Item<Name><i>`. Missing keys decode as empty.
    pub fn parse(ini: &IniFile) -> Vec<Self> {
        let Some(section) = ini.find_section("SEARCH") else {
            return Vec::new();
        };

        let count: usize = section
            .get_value("ItemNumb", "0")
            .trim()
            .parse()
            .unwrap_or(0);

        let item = |name: &str, index: usize| {
            section
                .get_value(&format!("Item{name}{index}"), "")
                .to_string()
        };

        (0..count)
            .map(|i| Self {
                name: item("Name", i),
                prefix: item("Pref", i),
                dictionary_type: item("DictionType", i).trim().parse().unwrap_or(0),
                menu_name: item("Menu", i),
                correction: item("ModByDic", i),
                truncation: item("Tranc", i),
                hint: item("Hint", i),
                mod_by_dic_auto: item("ModByDicAuto", i),
                logic: item("Logic", i),
                advance: item("Adv", i),
                format: item("Pft", i),
            })
            .collect()
    }
}

impl fmt::Display for SearchScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prefix, self.name)
    }
}
