//! Translation of the LaTeX math subset used by the report into Typst math.
//!
//! Only what the report's formulas need is understood: symbol commands,
//! fractions, roots, text, font styles and accents, groups, and sub/superscripts.
//! Anything else is rejected so the caller can fall back to a placeholder.

use ecow::EcoString;

use crate::Result;

/// Translates a LaTeX math expression into Typst math markup.
pub fn tex_to_typst(input: &str) -> Result<EcoString> {
    let mut translator = Translator {
        chars: input.chars().collect(),
        pos: 0,
    };
    let body = translator.sequence(false)?;
    Ok(body.trim().into())
}

struct Translator {
    chars: Vec<char>,
    pos: usize,
}

impl Translator {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Translates until the end of input, or until the closing brace of the
    /// current group when `in_group` is set.
    fn sequence(&mut self, in_group: bool) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.peek() {
                None if in_group => return Err("unbalanced braces: missing `}`".into()),
                None => break,
                Some('}') if in_group => {
                    self.pos += 1;
                    break;
                }
                Some('}') => return Err("unbalanced braces: unexpected `}`".into()),
                Some(_) => self.atom(&mut out)?,
            }
        }
        Ok(out)
    }

    /// Translates one syntactic unit and appends it to `out`.
    fn atom(&mut self, out: &mut String) -> Result<()> {
        let Some(c) = self.bump() else {
            return Err("unexpected end of expression".into());
        };

        match c {
            '{' => {
                let inner = self.sequence(true)?;
                push_separated(out, inner.trim());
            }
            '\\' => {
                let translated = self.command()?;
                push_separated(out, &translated);
            }
            '_' | '^' => {
                let arg = self.script_arg()?;
                out.push(c);
                out.push_str(&arg);
            }
            c if c.is_whitespace() => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c if c.is_alphanumeric() => push_alnum(out, c),
            '/' | '#' | '$' | '"' | '&' | '@' | ',' | '*' | '~' | '`' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }

        Ok(())
    }

    /// Reads the argument of `_` or `^` and returns it in Typst form.
    fn script_arg(&mut self) -> Result<String> {
        self.skip_spaces();
        match self.bump() {
            None => Err("missing script argument".into()),
            Some('{') => {
                let inner = self.sequence(true)?;
                Ok(format!("({})", inner.trim()))
            }
            Some('\\') => self.command(),
            Some('}') => Err("unbalanced braces: unexpected `}`".into()),
            Some(c) if matches!(c, '/' | '#' | '$' | '"' | '&' | '@' | ',') => Ok(format!("\\{c}")),
            Some(c) => Ok(c.to_string()),
        }
    }

    /// Reads a required `{...}` argument and translates its content.
    fn group_arg(&mut self, command: &str) -> Result<String> {
        self.skip_spaces();
        match self.peek() {
            Some('{') => {
                self.pos += 1;
                Ok(self.sequence(true)?.trim().to_owned())
            }
            Some(_) => {
                let mut out = String::new();
                self.atom(&mut out)?;
                Ok(out.trim().to_owned())
            }
            None => Err(format!("missing argument for `\\{command}`").into()),
        }
    }

    /// Reads a required `{...}` argument verbatim.
    fn raw_group_arg(&mut self, command: &str) -> Result<String> {
        self.skip_spaces();
        if self.bump() != Some('{') {
            return Err(format!("expected `{{` after `\\{command}`").into());
        }

        let mut depth = 0usize;
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err("unbalanced braces: missing `}`".into()),
                Some('{') => {
                    depth += 1;
                    text.push('{');
                }
                Some('}') if depth == 0 => break,
                Some('}') => {
                    depth -= 1;
                    text.push('}');
                }
                Some(c) => text.push(c),
            }
        }
        Ok(text)
    }

    /// Reads an optional `[...]` argument, translated.
    fn optional_arg(&mut self) -> Result<Option<String>> {
        self.skip_spaces();
        if self.peek() != Some('[') {
            return Ok(None);
        }
        self.pos += 1;

        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err("missing `]` in optional argument".into()),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.atom(&mut out)?,
            }
        }
        Ok(Some(out.trim().to_owned()))
    }

    /// Translates the command following a backslash.
    fn command(&mut self) -> Result<String> {
        let Some(first) = self.bump() else {
            return Err("dangling `\\` at end of expression".into());
        };

        if !first.is_ascii_alphabetic() {
            return escaped_symbol(first)
                .map(str::to_owned)
                .ok_or_else(|| format!("unknown command `\\{first}`").into());
        }

        let mut name = String::from(first);
        while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
            name.push(c);
            self.pos += 1;
        }

        if let Some(symbol) = symbol(&name) {
            return Ok(symbol.to_owned());
        }

        if let Some(op) = operator(&name) {
            return Ok(format!("{op} "));
        }

        match name.as_str() {
            "frac" | "dfrac" | "tfrac" => {
                let num = self.group_arg(&name)?;
                let den = self.group_arg(&name)?;
                Ok(format!("frac({num}, {den})"))
            }
            "sqrt" => {
                let index = self.optional_arg()?;
                let radicand = self.group_arg(&name)?;
                Ok(match index {
                    Some(index) => format!("root({index}, {radicand})"),
                    None => format!("sqrt({radicand})"),
                })
            }
            "text" | "mbox" => {
                let text = self.raw_group_arg(&name)?;
                Ok(quote(&text))
            }
            "mathrm" | "operatorname" => {
                let text = self.raw_group_arg(&name)?;
                Ok(format!("upright({})", quote(&text)))
            }
            "left" | "right" | "big" | "Big" | "bigg" | "Bigg" => Ok(String::new()),
            _ => match style(&name) {
                Some(func) => {
                    let arg = self.group_arg(&name)?;
                    Ok(format!("{func}({arg})"))
                }
                None => Err(format!("unknown command `\\{name}`").into()),
            },
        }
    }
}

/// Appends `text`, keeping it apart from a preceding letter or digit so Typst
/// does not read the pair as one identifier.
fn push_separated(out: &mut String, text: &str) {
    let starts_alnum = text.chars().next().is_some_and(char::is_alphanumeric);
    if starts_alnum && out.ends_with(char::is_alphanumeric) {
        out.push(' ');
    }
    out.push_str(text);
}

/// Letters are split apart, digits after a letter as well.
fn push_alnum(out: &mut String, c: char) {
    if out.ends_with(char::is_alphabetic) {
        out.push(' ');
    }
    out.push(c);
}

fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn escaped_symbol(c: char) -> Option<&'static str> {
    Some(match c {
        ',' => "thin",
        ';' | ':' => "med",
        '!' => "",
        ' ' => " ",
        '{' => "\\{",
        '}' => "\\}",
        '%' => "%",
        '_' => "\\_",
        '&' => "\\&",
        '#' => "\\#",
        '$' => "\\$",
        '|' => "‖",
        '\\' => "\\",
        _ => return None,
    })
}

fn operator(name: &str) -> Option<&'static str> {
    Some(match name {
        "min" => "min",
        "max" => "max",
        "lim" => "lim",
        "sup" => "sup",
        "inf" => "inf",
        "log" => "log",
        "ln" => "ln",
        "exp" => "exp",
        "sin" => "sin",
        "cos" => "cos",
        "tan" => "tan",
        "arg" => "arg",
        "det" => "det",
        "quad" => "quad",
        "qquad" => "wide",
        _ => return None,
    })
}

fn style(name: &str) -> Option<&'static str> {
    Some(match name {
        "mathbf" | "boldsymbol" => "bold",
        "mathit" => "italic",
        "mathcal" => "cal",
        "mathbb" => "bb",
        "mathsf" => "sans",
        "mathtt" => "mono",
        "hat" | "widehat" => "hat",
        "bar" | "overline" => "overline",
        "underline" => "underline",
        "tilde" | "widetilde" => "tilde",
        "vec" => "arrow",
        "dot" => "dot",
        "ddot" => "dot.double",
        _ => return None,
    })
}

fn symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "alpha" => "α",
        "beta" => "β",
        "gamma" => "γ",
        "delta" => "δ",
        "epsilon" => "ϵ",
        "varepsilon" => "ε",
        "zeta" => "ζ",
        "eta" => "η",
        "theta" => "θ",
        "vartheta" => "ϑ",
        "iota" => "ι",
        "kappa" => "κ",
        "lambda" => "λ",
        "mu" => "μ",
        "nu" => "ν",
        "xi" => "ξ",
        "pi" => "π",
        "rho" => "ρ",
        "sigma" => "σ",
        "tau" => "τ",
        "upsilon" => "υ",
        "phi" => "ϕ",
        "varphi" => "φ",
        "chi" => "χ",
        "psi" => "ψ",
        "omega" => "ω",
        "Gamma" => "Γ",
        "Delta" => "Δ",
        "Theta" => "Θ",
        "Lambda" => "Λ",
        "Xi" => "Ξ",
        "Pi" => "Π",
        "Sigma" => "Σ",
        "Upsilon" => "Υ",
        "Phi" => "Φ",
        "Psi" => "Ψ",
        "Omega" => "Ω",
        "sum" => "∑",
        "prod" => "∏",
        "int" => "∫",
        "oint" => "∮",
        "in" => "∈",
        "notin" => "∉",
        "ni" => "∋",
        "geq" | "ge" => "≥",
        "leq" | "le" => "≤",
        "neq" | "ne" => "≠",
        "approx" => "≈",
        "equiv" => "≡",
        "sim" => "∼",
        "propto" => "∝",
        "cdot" => "⋅",
        "times" => "×",
        "div" => "÷",
        "pm" => "±",
        "mp" => "∓",
        "ast" => "∗",
        "circ" => "∘",
        "infty" => "∞",
        "partial" => "∂",
        "nabla" => "∇",
        "forall" => "∀",
        "exists" => "∃",
        "neg" | "lnot" => "¬",
        "land" | "wedge" => "∧",
        "lor" | "vee" => "∨",
        "cup" => "∪",
        "cap" => "∩",
        "subset" => "⊂",
        "subseteq" => "⊆",
        "supset" => "⊃",
        "supseteq" => "⊇",
        "emptyset" | "varnothing" => "∅",
        "to" | "rightarrow" => "→",
        "leftarrow" | "gets" => "←",
        "Rightarrow" | "implies" => "⇒",
        "Leftarrow" => "⇐",
        "Leftrightarrow" | "iff" => "⇔",
        "mapsto" => "↦",
        "mid" => "∣",
        "ldots" | "dots" => "…",
        "cdots" => "⋯",
        "prime" => "′",
        "lbrace" => "\\{",
        "rbrace" => "\\}",
        "langle" => "⟨",
        "rangle" => "⟩",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tr(input: &str) -> String {
        tex_to_typst(input).unwrap().to_string()
    }

    #[test]
    fn test_simple_script() {
        assert_eq!(tr("x^2"), "x^2");
        assert_eq!(tr("x_{i}^{2}"), "x_(i)^(2)");
    }

    #[test]
    fn test_letters_are_split() {
        assert_eq!(tr("c_{ij}"), "c_(i j)");
        assert_eq!(tr("ab2"), "a b 2");
        assert_eq!(tr("2x"), "2x");
        assert_eq!(tr("12"), "12");
    }

    #[test]
    fn test_greek_letters_are_split() {
        assert_eq!(tr(r"xlpha"), "x α");
        assert_eq!(tr(r"lphaeta"), "α β");
        assert_eq!(tr(r"lpha2"), "α 2");
        assert_eq!(tr(r"2\pi"), "2 π");
        assert_eq!(tr("αβ"), "α β");
        assert_eq!(tr("成本"), "成 本");
    }

    #[test]
    fn test_fraction_and_root() {
        assert_eq!(tr(r"\frac{a}{b+1}"), "frac(a, b+1)");
        assert_eq!(tr(r"\sqrt[3]{x}"), "root(3, x)");
        assert_eq!(tr(r"\sqrt{2}"), "sqrt(2)");
    }

    #[test]
    fn test_text_is_quoted() {
        assert_eq!(tr(r"\text{cost}"), "\"cost\"");
        assert_eq!(tr(r"\mathrm{d}x"), "upright(\"d\")x");
    }

    #[test]
    fn test_objective_function() {
        let typst = tr(
            r"\min \sum_{v\in V}\sum_{(i,j)\in A} c_{ij} x_{v,ij} + \beta \sum_{r\in R}\sum_{h\in H_r} P_{r,h} y_{r,h}",
        );
        insta::assert_snapshot!(typst, @r"min ∑_(v∈ V)∑_((i\,j)∈ A) c_(i j) x_(v\,i j) + β ∑_(r∈ R)∑_(h∈ H_r) P_(r\,h) y_(r\,h)");
    }

    #[test]
    fn test_big_m_constraint() {
        let typst = tr(r"u_{v,j} \geq u_{v,i} + s_i + t_{ij} - M(1-x_{v,ij})");
        insta::assert_snapshot!(typst, @r"u_(v\,j) ≥ u_(v\,i) + s_i + t_(i j) - M(1-x_(v\,i j))");
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = tex_to_typst(r"\badcmd{x").unwrap_err();
        assert_eq!(err.to_string(), r"unknown command `\badcmd`");
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(tex_to_typst("{x").is_err());
        assert!(tex_to_typst("x}").is_err());
        assert!(tex_to_typst(r"\frac{a}{b").is_err());
    }

    #[test]
    fn test_slash_is_escaped() {
        assert_eq!(tr("a/b"), r"a\/b");
    }
}
