use crate::{ActProgress, ProgressReport, SectionTable, SubActProgress};

/// Annotates every act and sub-act of `sections` with its completion at
/// `page`.
///
/// Acts are laid end to end starting at page 0. Sub-acts are laid end to end
/// from the start of their parent act on a counter of their own; the outer
/// counter always advances by the act's own length, so sub-acts whose lengths
/// do not add up to the parent's will diverge from it.
pub(crate) fn compute_progress(page: i64, sections: &SectionTable) -> ProgressReport {
    let total = sections.total_length();
    let mut offset: i64 = 0;
    let mut acts = Vec::with_capacity(sections.acts().len());

    for act in sections.acts() {
        let pages = pages_into(page, offset);

        let mut sub_offset = offset;
        let sub = act
            .sub
            .iter()
            .map(|sub| {
                let sub_pages = pages_into(page, sub_offset);
                sub_offset = sub_offset.saturating_add(as_pages(sub.length));
                let progress = percent(sub_pages, sub.length);
                SubActProgress {
                    name: sub.name.clone(),
                    short: abbreviation(&sub.name),
                    length: sub.length,
                    progress,
                    complete: progress >= 100.0,
                    label: label(progress),
                }
            })
            .collect();

        offset = offset.saturating_add(as_pages(act.length));

        let progress = percent(pages, act.length);
        let short = abbreviation(&act.name);
        let complete = progress >= 100.0;
        acts.push(ActProgress {
            name: act.name.clone(),
            bar_label: if complete { short.clone() } else { label(progress) },
            short,
            length: act.length,
            progress,
            complete,
            label: label(progress),
            share: progress * act.length as f64 / total as f64,
            sub,
        });
    }

    ProgressReport {
        page,
        total_length: total,
        overall: percent(pages_into(page, 0), total),
        acts,
    }
}

/// First ASCII alphanumeric character of every maximal alphanumeric run in
/// `name`, concatenated.
pub(crate) fn abbreviation(name: &str) -> String {
    let mut short = String::new();
    let mut in_run = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if !in_run {
                short.push(ch);
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }
    short
}

pub(crate) fn label(progress: f64) -> String {
    format!("{progress:.1}%")
}

fn pages_into(page: i64, offset: i64) -> u64 {
    // saturating so i64::MIN / i64::MAX pages stay in range
    page.saturating_sub(offset).max(0) as u64
}

fn percent(pages: u64, length: u64) -> f64 {
    (100.0 * pages as f64 / length as f64).clamp(0.0, 100.0)
}

fn as_pages(length: u64) -> i64 {
    i64::try_from(length).unwrap_or(i64::MAX)
}
