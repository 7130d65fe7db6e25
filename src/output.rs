//! CLI output formatting.
//!
//! Every command has a `format_*` function returning lines (testable) and a
//! `print_*` wrapper. Text output puts the answer on the first line and
//! details on indented lines below it:
//!
//! ## normalize
//!
//! ```text
//! 800x600 crop 3200x2400+400+300
//!     stretch: no, keep aspect: no
//!     density: 1x1
//! ```
//!
//! ## resolve / batch
//!
//! ```text
//! #9 800x600 ← registered #5 (same-ratio)
//!     800x600 crop 3200x2400+400+300
//!     stretch: no, keep aspect: no
//!     density: 1x1
//! #10 300x300 ← fresh
//!     300x300
//!     stretch: no, keep aspect: no
//!     density: 1x1
//! ```
//!
//! JSON output is the serde rendering of the same values.

use serde::Serialize;

use crate::config::OutputFormat;
use crate::geometry::Fraction;
use crate::modifier::ImageModifier;
use crate::plan::{Plan, PlanOrigin};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn modifier_headline(modifier: &ImageModifier) -> String {
    if modifier.is_empty() {
        return "no transform".to_string();
    }
    let mut line = modifier.dimensions().to_string();
    if let Some(crop) = modifier.crop() {
        line.push_str(&format!(" crop {crop}"));
    }
    if let Some(format) = modifier.output() {
        line.push_str(&format!(" as {format}"));
    }
    line
}

/// Lines describing a modifier; `depth` indents the whole block.
pub fn format_modifier(modifier: &ImageModifier, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let detail = indent(depth + 1);
    let mut lines = vec![format!("{pad}{}", modifier_headline(modifier))];
    if !modifier.is_empty() {
        lines.push(format!(
            "{detail}stretch: {}, keep aspect: {}",
            yes_no(modifier.stretch()),
            yes_no(modifier.keep_aspect())
        ));
        lines.push(format!("{detail}density: {}", modifier.density()));
    }
    lines
}

fn origin_label(origin: &PlanOrigin) -> String {
    match origin {
        PlanOrigin::Registered {
            selector,
            resolution_id,
        } => format!("registered #{resolution_id} ({selector})"),
        PlanOrigin::Fresh => "fresh".to_string(),
    }
}

pub fn format_plans(plans: &[Plan]) -> Vec<String> {
    let mut lines = Vec::new();
    for plan in plans {
        lines.push(format!(
            "#{} {}x{} ← {}",
            plan.resolution.id,
            plan.resolution.width,
            plan.resolution.height,
            origin_label(&plan.origin)
        ));
        lines.extend(format_modifier(&plan.modifier, 1));
    }
    lines
}

pub fn format_fraction(fraction: &Fraction) -> Vec<String> {
    vec![
        fraction.to_string(),
        format!("{}url: {}", indent(1), fraction.to_url_string()),
        format!("{}value: {:.6}", indent(1), fraction.to_f64()),
    ]
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_modifier(modifier: &ImageModifier, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => print_lines(format_modifier(modifier, 0)),
        OutputFormat::Json => print_json(modifier)?,
    }
    Ok(())
}

pub fn print_plans(plans: &[Plan], format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => print_lines(format_plans(plans)),
        OutputFormat::Json => print_json(plans)?,
    }
    Ok(())
}

pub fn print_fraction(fraction: &Fraction, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => print_lines(format_fraction(fraction)),
        OutputFormat::Json => print_json(fraction)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Crop, Dimensions};
    use crate::modifier::ImageFormat;
    use crate::selection::Resolution;

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn empty_modifier_is_one_line() {
        assert_eq!(format_modifier(&ImageModifier::EMPTY, 0), vec!["no transform"]);
    }

    #[test]
    fn modifier_lines_show_crop_and_flags() {
        let modifier = ImageModifier::new(800, 600)
            .with_crop(Crop::new(400, 300, 3200, 2400))
            .with_keep_aspect(true)
            .with_output(Some(ImageFormat::Webp));
        let lines = format_modifier(&modifier, 0);
        assert_eq!(lines[0], "800x600 crop 3200x2400+400+300 as webp");
        assert_eq!(lines[1], "    stretch: no, keep aspect: yes");
        assert_eq!(lines[2], "    density: 1x1");
    }

    #[test]
    fn plan_lines_show_origin() {
        let plans = [
            Plan {
                image_id: 1,
                resolution: Resolution::new(9, 800, 600),
                origin: PlanOrigin::Registered {
                    selector: "same-ratio",
                    resolution_id: 5,
                },
                modifier: ImageModifier::new(800, 600),
            },
            Plan {
                image_id: 1,
                resolution: Resolution::new(10, 300, 300),
                origin: PlanOrigin::Fresh,
                modifier: ImageModifier::new(300, 300).with_density(Dimensions::new(2, 2)),
            },
        ];
        let lines = format_plans(&plans);
        assert_eq!(lines[0], "#9 800x600 ← registered #5 (same-ratio)");
        assert_eq!(lines[1], "    800x600");
        assert_eq!(lines[4], "#10 300x300 ← fresh");
        assert_eq!(lines[7], "        density: 2x2");
    }

    #[test]
    fn fraction_lines() {
        let lines = format_fraction(&Fraction::new(1920, 1080).unwrap());
        assert_eq!(lines[0], "16/9");
        assert_eq!(lines[1], "    url: 16%2F9");
        assert_eq!(lines[2], "    value: 1.777778");
    }
}
