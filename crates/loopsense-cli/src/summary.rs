use std::path::Path;

use console::Style;
use loopsense_core::config::LoopsenseConfig;

use crate::commands::detect::DetectSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    hit: Style,
    disabled: Style,
    path: Style,
    error: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            hit: Style::new().green().bold(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            error: Style::new().red().bold(),
        }
    }
}

pub fn print_detect_settings(config: &LoopsenseConfig) {
    let s = Styles::new();
    let d = &config.detector;

    println!();
    println!("  {}", s.title.apply_to("Loopsense Detect"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    println!("  {}", s.header.apply_to("Motion"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Downsample"),
        s.value.apply_to(format!("1/{}", d.downsample))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Threshold"),
        s.value.apply_to(d.motion_threshold)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Min blob"),
        s.value.apply_to(format!("{} px", d.min_blob_px))
    );
    println!();

    println!("  {}", s.header.apply_to("Circle"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Path"),
        s.value
            .apply_to(format!("{} / {} points", d.min_fit_points, d.path_buffer_size))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Radius"),
        s.value
            .apply_to(format!("{:.2} - {:.2}", d.min_radius_frac, d.max_radius_frac))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Residual"),
        s.value.apply_to(format!("<= {:.2}", d.max_residual_ratio))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Arc"),
        s.value.apply_to(format!(">= {:.0} deg", d.min_arc_degrees))
    );
    println!();

    println!("  {}", s.header.apply_to("Confirmation"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Streak"),
        s.value.apply_to(config.confirm.confirm_streak)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Hold"),
        s.value.apply_to(format!("{} ms", config.confirm.hold_ms))
    );
    println!();
}

pub fn print_detect_summary(summary: &DetectSummary) {
    let s = Styles::new();

    println!("  {}", s.path.apply_to(summary.input.display()));
    for line in &summary.trace {
        println!("    {}", s.label.apply_to(line));
    }

    println!(
        "    {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(summary.frames)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Positive"),
        s.value.apply_to(summary.positive_frames)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Missed"),
        s.value.apply_to(summary.missed_frames)
    );
    print_frame_event(&s, "Detected", summary.first_detection);
    print_frame_event(&s, "Confirmed", summary.first_confirmation);
    print_frame_event(&s, "Triggered", summary.triggered_at);
    println!(
        "    {:<14}{}",
        s.label.apply_to("Best arc"),
        s.value.apply_to(format!("{:.0} deg", summary.best_arc_degrees))
    );

    match summary.last_fit {
        Some(fit) => println!(
            "    {:<14}{}",
            s.label.apply_to("Last fit"),
            s.value.apply_to(format!(
                "center ({:.3}, {:.3})  r={:.3}  res={:.3}",
                fit.center.x, fit.center.y, fit.radius, fit.residual_ratio
            ))
        ),
        None => println!(
            "    {:<14}{}",
            s.label.apply_to("Last fit"),
            s.disabled.apply_to("none")
        ),
    }
    println!();
}

pub fn print_input_error(input: &Path, err: &anyhow::Error) {
    let s = Styles::new();
    println!("  {}", s.path.apply_to(input.display()));
    println!("    {} {:#}", s.error.apply_to("error:"), err);
    println!();
}

fn print_frame_event(s: &Styles, label: &str, frame: Option<usize>) {
    match frame {
        Some(i) => println!(
            "    {:<14}{}",
            s.label.apply_to(label),
            s.hit.apply_to(format!("frame {i}"))
        ),
        None => println!(
            "    {:<14}{}",
            s.label.apply_to(label),
            s.disabled.apply_to("never")
        ),
    }
}
