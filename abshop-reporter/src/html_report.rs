use abshop::data::Promo;
use abshop::stats::{GroupStats, PromoEffect};
use abshop::{AbShopResult, AnalysisSummary};
use std::{fs, path::Path};

fn effect_html(effect: &PromoEffect) -> String {
    match effect {
        PromoEffect::Increased { p_value } => {
            format!("<font color='green'>sales increased (p-value {:.3e})</font>", p_value)
        }
        PromoEffect::Decreased { p_value } => {
            format!("<font color='red'>sales decreased (p-value {:.3e})</font>", p_value)
        }
        PromoEffect::Inconclusive => "inconclusive (no significant change)".to_string(),
    }
}

fn format_value(v: f64) -> String {
    if v.is_finite() {
        format!("{:.2}", v)
    } else {
        "-".to_string()
    }
}

fn replace_group_stats(template: String, stats: Option<&GroupStats>, promo: &Promo) -> String {
    let get = |f: fn(&GroupStats) -> f64| stats.map(f).unwrap_or(f64::NAN);
    let count = stats.map(|s| s.count).unwrap_or_default();

    [
        ("COUNT", count.to_string()),
        ("TOTAL", format_value(get(|s| s.total))),
        ("MEAN", format_value(get(|s| s.mean))),
        ("STDEV", format_value(get(|s| s.std.unwrap_or(f64::NAN)))),
        ("MIN", format_value(get(|s| s.min))),
        ("Q1", format_value(get(|s| s.quartile_fst))),
        ("Q2", format_value(get(|s| s.median))),
        ("Q3", format_value(get(|s| s.quartile_trd))),
        ("MAX", format_value(get(|s| s.max))),
    ]
    .iter()
    .fold(template, |template, (key, value)| {
        template.replace(&format!("${}_{}$", key, promo), value)
    })
}

pub(crate) fn render_summary_html(summary: &AnalysisSummary) -> String {
    let mut template = include_str!("./templates/summary_template.html").to_string();
    template = template.replace("$FILTER$", summary.filter.to_string().as_str());

    for promo in [Promo::Without, Promo::With] {
        template = replace_group_stats(template, summary.group_stats.get(&promo), &promo);
    }

    let result = &summary.test_result;
    let bootstrap_interval = match &summary.bootstrap {
        Some(bs) => format!(
            "[{}, {}] ({:.0}%)",
            format_value(bs.lower_bound),
            format_value(bs.upper_bound),
            (1.0 - bs.alpha) * 100.0
        ),
        None => "-".to_string(),
    };

    let mut replace_key_value =
        |(key, v): (&str, String)| template = template.replace(key, v.as_str());

    replace_key_value(("$T_STAT$", format_value(result.t_statistic)));
    replace_key_value(("$DF$", format_value(result.df)));
    replace_key_value(("$P_VALUE$", format!("{:.3e}", result.p_value)));
    replace_key_value(("$MEAN_DIFF$", format_value(result.mean_difference)));
    replace_key_value(("$BOOTSTRAP_INTERVAL$", bootstrap_interval));
    replace_key_value(("$ALPHA$", summary.alpha.to_string()));
    replace_key_value(("$OUTCOME$", effect_html(&summary.effect)));

    template
}

pub(crate) fn write_summary_html(summary: &AnalysisSummary, file: &Path) -> AbShopResult<()> {
    fs::write(file, render_summary_html(summary))?;
    Ok(())
}
