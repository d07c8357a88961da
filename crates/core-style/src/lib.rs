//! Terminal Style Sheet (TSS): cascade of style properties into ANSI
//! sequences; width/clip/align/wrap resolution (spec §4.B).

pub mod apply;
pub mod color;
pub mod props;
pub mod sheet;
pub mod width;

pub use apply::{apply, render, ApplyContext};
pub use color::{Color, NamedColor};
pub use props::{Align, Attrs, StyleProps, Width};
pub use sheet::StyleSheet;

/// `CSI <n1;n2;...> m` for arbitrary SGR parameter lists (shared by style and
/// color emission, spec §6).
pub fn sgr(params: &[u16]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let joined = params
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(";");
    format!("\x1b[{joined}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_joins_params() {
        assert_eq!(sgr(&[1, 38, 5, 200]), "\x1b[1;38;5;200m");
    }
}
