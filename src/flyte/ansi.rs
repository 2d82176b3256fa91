// This file is part of the terraform-provider-unionai project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // SGR sequences: ESC [ <params> m
    static ref ANSI_CODE: Regex = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
}

/// Remove terminal color and style codes, keeping everything else untouched
pub fn strip_ansi_codes(text: &str) -> Cow<'_, str> {
    ANSI_CODE.replace_all(text, "")
}
