use std::collections::HashMap;

/// Resolves a license identifier to its canonical full name.
pub trait LicenseRegistry {
    fn full_name(&self, id: &str) -> Option<String>;
}

/// Built-in SPDX name table with user-supplied overrides on top.
#[derive(Debug, Default)]
pub struct SpdxRegistry {
    overrides: HashMap<String, String>,
}

impl SpdxRegistry {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        SpdxRegistry { overrides }
    }
}

impl LicenseRegistry for SpdxRegistry {
    fn full_name(&self, id: &str) -> Option<String> {
        let id = id.trim();
        self.overrides
            .get(id)
            .cloned()
            .or_else(|| spdx_full_name(id).map(str::to_string))
    }
}

/// Full name of a canonical SPDX identifier, including deprecated short forms.
pub fn spdx_full_name(id: &str) -> Option<&'static str> {
    let name = match id {
        // Permissive
        "MIT" => "MIT License",
        "MIT-0" => "MIT No Attribution",
        "Apache-2.0" => "Apache License 2.0",
        "BSD-2-Clause" => "BSD 2-Clause \"Simplified\" License",
        "BSD-3-Clause" => "BSD 3-Clause \"New\" or \"Revised\" License",
        "BSD-4-Clause" => "BSD 4-Clause \"Original\" or \"Old\" License",
        "0BSD" => "BSD Zero Clause License",
        "ISC" => "ISC License",
        "Unlicense" => "The Unlicense",
        "Zlib" => "zlib License",
        "CC0-1.0" => "Creative Commons Zero v1.0 Universal",
        "CC-BY-3.0" => "Creative Commons Attribution 3.0 Unported",
        "CC-BY-4.0" => "Creative Commons Attribution 4.0 International",
        "WTFPL" => "Do What The F*ck You Want To Public License",
        "PSF-2.0" => "Python Software Foundation License 2.0",
        "Python-2.0" => "Python License 2.0",
        "BlueOak-1.0.0" => "Blue Oak Model License 1.0.0",
        "Artistic-2.0" => "Artistic License 2.0",
        "BSL-1.0" => "Boost Software License 1.0",
        "Unicode-DFS-2016" => "Unicode License Agreement - Data Files and Software (2016)",
        "Unicode-3.0" => "Unicode License v3",

        // Weak copyleft
        "LGPL-2.0" | "LGPL-2.0-only" => "GNU Library General Public License v2 only",
        "LGPL-2.0-or-later" => "GNU Library General Public License v2 or later",
        "LGPL-2.1" | "LGPL-2.1-only" => "GNU Lesser General Public License v2.1 only",
        "LGPL-2.1-or-later" => "GNU Lesser General Public License v2.1 or later",
        "LGPL-3.0" | "LGPL-3.0-only" => "GNU Lesser General Public License v3.0 only",
        "LGPL-3.0-or-later" => "GNU Lesser General Public License v3.0 or later",
        "MPL-2.0" => "Mozilla Public License 2.0",
        "EUPL-1.1" => "European Union Public License 1.1",
        "EUPL-1.2" => "European Union Public License 1.2",
        "CDDL-1.0" => "Common Development and Distribution License 1.0",
        "EPL-1.0" => "Eclipse Public License 1.0",
        "EPL-2.0" => "Eclipse Public License 2.0",
        "APSL-2.0" => "Apple Public Source License 2.0",
        "OSL-3.0" => "Open Software License 3.0",

        // Strong copyleft
        "GPL-2.0" | "GPL-2.0-only" => "GNU General Public License v2.0 only",
        "GPL-2.0-or-later" => "GNU General Public License v2.0 or later",
        "GPL-3.0" | "GPL-3.0-only" => "GNU General Public License v3.0 only",
        "GPL-3.0-or-later" => "GNU General Public License v3.0 or later",
        "AGPL-3.0" | "AGPL-3.0-only" => "GNU Affero General Public License v3.0 only",
        "AGPL-3.0-or-later" => "GNU Affero General Public License v3.0 or later",

        _ => return None,
    };
    Some(name)
}
