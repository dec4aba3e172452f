use console::{measure_text_width, Style};

use crate::cluster::ClusterInfo;

pub const SSH_USER: &str = "ubuntu";

const LABEL_WIDTH: usize = 14;
const PADDING_H: usize = 2;
const PADDING_V: usize = 1;
const ACCENT: u8 = 62;

lazy_static::lazy_static! {
    static ref TITLE: Style = Style::new().bold().color256(15).on_color256(ACCENT);
    static ref SECTION: Style = Style::new().bold().color256(86);
    static ref LABEL: Style = Style::new().color256(245);
    static ref VALUE: Style = Style::new().bold().color256(42);
    static ref PATH: Style = Style::new().color256(214);
    static ref CMD: Style = Style::new().color256(252).on_color256(236);
    static ref BORDER: Style = Style::new().color256(ACCENT);
}

pub fn render_json(info: &ClusterInfo) -> serde_json::Result<String> {
    serde_json::to_string_pretty(info)
}

pub fn ssh_command(info: &ClusterInfo, host: &str) -> String {
    let key = info.ssh_key_path.display();
    format!("ssh -i {key} {SSH_USER}@{host}")
}

fn field(label: &str, value: impl std::fmt::Display) -> String {
    let label = LABEL.apply_to(format!("{label:<LABEL_WIDTH$}"));
    format!("  {label} {value}")
}

fn command_line(cmd: String) -> String {
    format!("  {}", CMD.apply_to(format!(" {cmd} ")))
}

/// Renders the human readable cluster summary, ending with a newline.
pub fn render_summary(info: &ClusterInfo) -> String {
    let cp = &info.control_plane;
    let worker = &info.worker;
    let key_path = info.ssh_key_path.display().to_string();

    let content = vec![
        SECTION.apply_to("CONTROL-PLANE").to_string(),
        field("Public IP:", VALUE.apply_to(&cp.public_ip)),
        field("Private IP:", &cp.private_ip),
        String::new(),
        SECTION.apply_to("WORKER").to_string(),
        field("Public IP:", VALUE.apply_to(&worker.public_ip)),
        field("Private IP:", &worker.private_ip),
        String::new(),
        SECTION.apply_to("SSH CONNECTION").to_string(),
        field("Key:", PATH.apply_to(&key_path)),
        String::new(),
        "  Control-plane:".to_owned(),
        command_line(ssh_command(info, &cp.public_ip)),
        String::new(),
        "  Worker:".to_owned(),
        command_line(ssh_command(info, &worker.public_ip)),
    ];

    let pad = " ".repeat(PADDING_H);
    let title = TITLE.apply_to(format!("{pad}🚀 K8S-LAB CLUSTER{pad}"));

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{title}\n\n"));
    out.push_str(&boxed(&content));
    out.push('\n');
    out
}

/// Draws a rounded border around `lines`, padding every line to the widest.
fn boxed(lines: &[String]) -> String {
    let width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0);
    let inner = width + 2 * PADDING_H;
    let side = BORDER.apply_to("│");
    let blank = format!("{side}{}{side}\n", " ".repeat(inner));

    let mut out = String::new();
    let top = BORDER.apply_to(format!("╭{}╮", "─".repeat(inner)));
    out.push_str(&format!("{top}\n"));
    for _ in 0..PADDING_V {
        out.push_str(&blank);
    }
    for line in lines {
        let fill = width - measure_text_width(line);
        out.push_str(&format!(
            "{side}{pad}{line}{}{pad}{side}\n",
            " ".repeat(fill),
            pad = " ".repeat(PADDING_H)
        ));
    }
    for _ in 0..PADDING_V {
        out.push_str(&blank);
    }
    let bottom = BORDER.apply_to(format!("╰{}╯", "─".repeat(inner)));
    out.push_str(&format!("{bottom}\n"));
    out
}
