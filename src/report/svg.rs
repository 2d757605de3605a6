// Static SVG rendering of the computed layouts.

use crate::report::*;
use survey_charts::line::SERIES_PALETTE;

const TITLE_HEIGHT: u32 = 32;
const BAR_WIDTH: u32 = 40;
const BAR_GAP: u32 = 16;
const LABEL_HEIGHT: u32 = 40;
const LEGEND_ROW: f64 = 18.0;

fn svg_header(w: u32, h: u32) -> String {
    format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect width=\"{w}\" height=\"{h}\" fill=\"white\"/>\n"
    )
}

fn svg_title(svg: &mut String, w: u32, title: &str) {
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"20\" text-anchor=\"middle\" font-size=\"14\" font-weight=\"bold\">{}</text>\n",
        w as f64 / 2.0,
        escape_xml(title)
    ));
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn color(idx: usize) -> &'static str {
    SERIES_PALETTE[idx % SERIES_PALETTE.len()]
}

/// A pie laid out with `layout_pie(_, radius)`, under a title.
pub fn pie_svg(title: &str, slices: &[Slice], radius: f64) -> String {
    let w = (2.0 * radius).ceil() as u32;
    let h = w + TITLE_HEIGHT;
    let mut svg = svg_header(w, h);
    svg_title(&mut svg, w, title);
    if slices.is_empty() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" fill=\"#6b7280\">Nessuna risposta</text>\n",
            radius,
            radius + TITLE_HEIGHT as f64
        ));
    }
    svg.push_str(&format!("<g transform=\"translate(0,{})\">\n", TITLE_HEIGHT));
    for (idx, s) in slices.iter().enumerate() {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\" stroke=\"white\" stroke-width=\"1\"><title>{}: {}</title></path>\n",
            s.path,
            color(idx),
            escape_xml(&s.label),
            s.value
        ));
    }
    for s in slices.iter() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"11\" fill=\"white\">{} ({:.0}%)</text>\n",
            s.label_point.x,
            s.label_point.y,
            escape_xml(&s.label),
            s.fraction * 100.0
        ));
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

/// Vertical bars on a shared baseline. Placeholder bars are drawn as a dashed outline.
pub fn bars_svg(title: &str, bars: &[Bar], max_height_px: u32) -> String {
    let n = bars.len().max(1) as u32;
    let w = BAR_GAP + n * (BAR_WIDTH + BAR_GAP);
    let h = TITLE_HEIGHT + max_height_px + LABEL_HEIGHT;
    let baseline = (TITLE_HEIGHT + max_height_px) as f64;
    let mut svg = svg_header(w, h);
    svg_title(&mut svg, w, title);
    svg.push_str(&format!(
        "<line x1=\"0\" y1=\"{:.2}\" x2=\"{}\" y2=\"{:.2}\" stroke=\"#9ca3af\"/>\n",
        baseline, w, baseline
    ));
    for (idx, b) in bars.iter().enumerate() {
        let x = (BAR_GAP + idx as u32 * (BAR_WIDTH + BAR_GAP)) as f64;
        let center = x + BAR_WIDTH as f64 / 2.0;
        if b.placeholder {
            let ph = MIN_BAR_HEIGHT_PX.min(max_height_px) as f64;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{}\" height=\"{:.2}\" fill=\"none\" stroke=\"#9ca3af\" stroke-dasharray=\"2,2\"/>\n",
                x,
                baseline - ph,
                BAR_WIDTH,
                ph
            ));
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#6b7280\">n/d</text>\n",
                center,
                baseline - ph - 4.0
            ));
        } else {
            let top = baseline - b.height_px as f64;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                x,
                top,
                BAR_WIDTH,
                b.height_px,
                color(0)
            ));
            if let Some(v) = b.value {
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"10\">{:.2}</text>\n",
                    center,
                    top - 4.0,
                    v
                ));
            }
        }
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"10\">{}</text>\n",
            center,
            baseline + 14.0,
            escape_xml(&b.label)
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Axes, the visible series and a legend listing every series.
/// Hidden series appear faded in the legend and are not drawn.
pub fn lines_svg(title: &str, chart: &LineChart) -> String {
    let plot = chart.axes.plot;
    let legend_top = plot.bottom() + 32.0;
    let w = (plot.right() + 24.0).ceil() as u32;
    let legend_height = LEGEND_ROW * chart.series.len() as f64 + 8.0;
    let h = (legend_top + legend_height).ceil() as u32 + TITLE_HEIGHT;
    let mut svg = svg_header(w, h);
    svg_title(&mut svg, w, title);
    svg.push_str(&format!("<g transform=\"translate(0,{})\">\n", TITLE_HEIGHT));

    svg.push_str(&format!(
        "<path d=\"M{:.2},{:.2} L{:.2},{:.2} L{:.2},{:.2}\" fill=\"none\" stroke=\"#9ca3af\"/>\n",
        plot.left,
        plot.top,
        plot.left,
        plot.bottom(),
        plot.right(),
        plot.bottom()
    ));
    for t in chart.axes.y_ticks.iter() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"10\">{:.0}</text>\n",
            plot.left - 6.0,
            t.position + 3.0,
            t.value
        ));
    }
    for t in chart.axes.x_ticks.iter() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"10\">{:.0}</text>\n",
            t.position,
            plot.bottom() + 14.0,
            t.value
        ));
    }

    for s in chart.visible() {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            s.path(),
            s.color
        ));
        for p in s.points.iter() {
            svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"3\" fill=\"{}\"/>\n",
                p.x, p.y, s.color
            ));
        }
    }

    for (idx, s) in chart.series.iter().enumerate() {
        let y = legend_top + LEGEND_ROW * idx as f64;
        let opacity = if s.hidden { "0.35" } else { "1" };
        svg.push_str(&format!(
            "<g opacity=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"10\" height=\"10\" fill=\"{}\"/>\
             <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"11\">{}</text></g>\n",
            opacity,
            plot.left,
            y,
            s.color,
            plot.left + 16.0,
            y + 9.0,
            escape_xml(&s.label)
        ));
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> LineChart {
        let series = vec![
            SeriesInput {
                key: "q1".to_string(),
                label: "Utilità".to_string(),
                distribution: Distribution::from_pairs(&[(4, 3), (5, 1)]),
            },
            SeriesInput {
                key: "q2".to_string(),
                label: "Tempi & modi".to_string(),
                distribution: Distribution::from_pairs(&[(1, 2)]),
            },
        ];
        layout_lines(&series, &LIKERT_DOMAIN, PlotArea::new(48.0, 16.0, 400.0, 200.0)).unwrap()
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn hidden_series_are_not_drawn() {
        let mut c = chart();
        let shown = lines_svg("Risposte", &c);
        assert_eq!(shown.matches("stroke-width=\"2\"").count(), 2);
        let mut legend = LegendState::new();
        legend.toggle_in(&mut c, "q2");
        let hidden = lines_svg("Risposte", &c);
        assert_eq!(hidden.matches("stroke-width=\"2\"").count(), 1);
        // The legend still lists it.
        assert!(hidden.contains("Tempi &amp; modi"));
        assert!(hidden.contains("opacity=\"0.35\""));
    }

    #[test]
    fn pie_and_bars() {
        let b = DemographicBreakdown::from_buckets("sesso", &[("F", 3), ("M", 1)]);
        let slices = layout_pie(&b, 50.0).unwrap();
        let svg = pie_svg("Sesso", &slices, 50.0);
        assert!(svg.starts_with("<svg width=\"100\" height=\"132\""));
        assert_eq!(svg.matches("<path ").count(), 2);
        assert!(svg.contains("F (75%)"));

        let bars = layout_bars(&[BarInput::new("a", 2.0), BarInput::missing("b")], 100);
        let svg = bars_svg("Medie", &bars, 100);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(">2.00<"));
        assert!(svg.ends_with("</svg>\n"));
    }
}
