//! Markdown README renderer.
//!
//! Single-pass and deterministic: given the same schema, quickstart and
//! prototype sequence, two renders produce byte-identical output. Prototypes
//! and their parameters are emitted in input order; quickstart flags iterate
//! lexicographically by name (the schema stores them in a `BTreeMap`).

use crate::anchors;
use crate::model::{Param, Prototype};
use crate::render::Style;
use crate::schema::{LibrarySchema, QuickStart};

/// Render the complete README as one string.
pub fn render(
    schema: &LibrarySchema,
    quick_start: &QuickStart,
    prototypes: &[Prototype],
    style: Style,
) -> String {
    let mut out = String::new();

    render_header(&mut out, schema, style);
    render_toc(&mut out, prototypes, style);
    render_quick_start(&mut out, schema, quick_start, style);
    render_library_overview(&mut out, schema, style);
    render_reference(&mut out, quick_start, prototypes, style);
    line(&mut out, "[rootReadme]: https://github.com/ksonnet/mixins");

    out
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn blank(out: &mut String) {
    out.push('\n');
}

// -- Sections -----------------------------------------------------------------

fn render_header(out: &mut String, schema: &LibrarySchema, style: Style) {
    line(out, &format!("# {}", schema.name));
    blank(out);
    if style == Style::Deploy {
        line(
            out,
            &format!(
                "> This library helps you deploy [{}]({}) to your cluster.",
                schema.output, schema.link
            ),
        );
    }
    line(out, &schema.description);
    blank(out);
}

fn render_toc(out: &mut String, prototypes: &[Prototype], style: Style) {
    line(out, "* [Quickstart](#quickstart)");
    line(out, "* [Prototype Reference](#prototype-reference)");
    for proto in prototypes {
        // The plain style surfaces @shortDescription next to the entry.
        match (style, &proto.short_description) {
            (Style::Plain, Some(short)) => {
                line(out, &format!("{}: {}", anchors::toc_entry(&proto.name), short));
            }
            _ => line(out, &anchors::toc_entry(&proto.name)),
        }
    }
    blank(out);
}

fn render_quick_start(
    out: &mut String,
    schema: &LibrarySchema,
    quick_start: &QuickStart,
    style: Style,
) {
    line(out, "## Quickstart");
    blank(out);

    match style {
        Style::Deploy => {
            line(
                out,
                &format!(
                    "*Using the [`{}`]({}) prototype, the following commands generate the configuration for {}, and then deploy it to your cluster.*",
                    quick_start.prototype, quick_start.prototype, schema.output
                ),
            );
            blank(out);
            line(
                out,
                "1. First, create a cluster and install the ksonnet CLI (see the root-level [README.md](rootReadme)).",
            );
            blank(out);
            line(
                out,
                "2. If you haven't yet created a ksonnet application, do so using `ks init <app-name>`.",
            );
            blank(out);
            line(out, "3. Finally, in the ksonnet application directory, run the following:");
            blank(out);
        }
        Style::Plain => {
            if !quick_start.comment.is_empty() {
                line(out, &quick_start.comment);
                blank(out);
            }
        }
    }

    line(out, "```shell");
    if style == Style::Deploy {
        line(out, "# Expand prototype as a Jsonnet file, place in a file in the");
        line(out, "# `components/` directory. (YAML and JSON are also available.)");
    }
    let flag_lines: Vec<String> = quick_start
        .flags
        .iter()
        .map(|(name, value)| format!("  --{} {}", name, value))
        .collect();
    out.push_str(&command_block(
        format!(
            "$ ks prototype use {} {}",
            quick_start.prototype, quick_start.component_name
        ),
        flag_lines,
    ));
    out.push('\n');
    if style == Style::Deploy {
        blank(out);
        line(out, "# Apply to server.");
        line(out, &format!("$ ks apply -f {}.jsonnet", quick_start.component_name));
    }
    line(out, "```");
    blank(out);
}

fn render_library_overview(out: &mut String, schema: &LibrarySchema, style: Style) {
    match style {
        Style::Deploy => {
            line(
                out,
                &format!("Specifically, the *{}* library files provide:", schema.name),
            );
            blank(out);
            line(
                out,
                &format!(
                    "* A set of relevant **parts** (_e.g._, deployments, services, secrets, and so on) that can be combined to configure {} for a wide variety of scenarios.",
                    schema.output
                ),
            );
            blank(out);
            line(
                out,
                &format!(
                    "* A set of **prototypes**, which are pre-fabricated \"flavors\" (or \"distributions\") of *{}*, each configured for a different use case. By passing in certain parameters, users can interactively customize these prototypes for their specific needs.",
                    schema.name
                ),
            );
            blank(out);
        }
        Style::Plain => {
            line(
                out,
                &format!(
                    "The *{}* library ships a set of prototypes. Each prototype is a pre-fabricated configuration that can be customized through its parameters.",
                    schema.name
                ),
            );
            blank(out);
        }
    }
}

fn render_reference(
    out: &mut String,
    quick_start: &QuickStart,
    prototypes: &[Prototype],
    style: Style,
) {
    line(out, "## Prototype Reference");
    blank(out);

    if style == Style::Deploy {
        line(out, "The set of available prototypes are enumerated below.");
        blank(out);
        for proto in prototypes {
            line(out, &anchors::toc_entry(&proto.name));
        }
        blank(out);
    }

    for proto in prototypes {
        render_prototype(out, quick_start, proto, style);
    }
}

fn render_prototype(out: &mut String, quick_start: &QuickStart, proto: &Prototype, style: Style) {
    line(out, &format!("### {}", proto.name));
    blank(out);
    match style {
        Style::Deploy => line(
            out,
            &format!("When generated and applied, this prototype {}", proto.description),
        ),
        Style::Plain => line(out, &proto.description),
    }
    blank(out);

    line(out, "#### Example");
    blank(out);
    line(out, "```shell");
    if style == Style::Deploy {
        line(out, "# Expand prototype as a Jsonnet file, place in a file in the");
        line(out, "# `components/` directory. (YAML and JSON are also available.)");
    }
    let flag_lines: Vec<String> = proto
        .params
        .iter()
        .map(|param| format!("  --{} {}", param.name, placeholder(&param.name)))
        .collect();
    out.push_str(&command_block(
        format!("$ ks prototype use {} {}", proto.name, quick_start.component_name),
        flag_lines,
    ));
    out.push('\n');
    line(out, "```");
    blank(out);

    if style == Style::Deploy {
        line(out, "Below is the Jsonnet file generated by this command.");
        blank(out);
        line(out, "```");
        line(out, &format!("// {}.jsonnet", quick_start.component_name));
        line(out, "<JSONNET HERE>");
        line(out, "```");
        blank(out);
    }

    line(out, "#### Parameters");
    blank(out);
    line(out, "The available options to pass to the prototype are:");
    blank(out);
    match style {
        Style::Deploy => render_param_table(out, &proto.params),
        Style::Plain => render_param_list(out, &proto.params),
    }
    blank(out);
}

// -- Building blocks ----------------------------------------------------------

/// Join a command and its flag lines with shell line continuations; the last
/// line carries no continuation marker.
fn command_block(command: String, flag_lines: Vec<String>) -> String {
    let mut lines = vec![command];
    lines.extend(flag_lines);
    lines.join(" \\\n")
}

/// `memory` → `YOUR_MEMORY_HERE`
fn placeholder(name: &str) -> String {
    format!("YOUR_{}_HERE", name.to_uppercase())
}

/// Pipe-delimited parameter table, rows in declaration order.
fn render_param_table(out: &mut String, params: &[Param]) {
    line(out, "| Name | Type | Description |");
    line(out, "| --- | --- | --- |");
    for param in params {
        line(
            out,
            &format!(
                "| `--{}` | *{}* | {} |",
                param.name, param.param_type, param.description
            ),
        );
    }
}

/// Bullet-list parameter rendering, rows in declaration order.
fn render_param_list(out: &mut String, params: &[Param]) {
    for param in params {
        line(
            out,
            &format!(
                "* **--{}** ({}): {}",
                param.name, param.param_type, param.description
            ),
        );
    }
}
