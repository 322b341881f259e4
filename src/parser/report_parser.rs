use log::{debug, info, trace};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::core::config::DEFAULT_ROW_SELECTOR;
use crate::fetcher::RenderedPage;
use crate::report::SeismicReport;
use crate::{ScraperError, ScraperResult};

/// Rows with fewer cells than this are not reports.
pub const MIN_CELLS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub reports: Vec<SeismicReport>,
    pub rows_seen: usize,
    pub rows_dropped: usize,
}

/// Maps the rows of the reports table onto [`SeismicReport`]s, in page order.
pub struct ReportParser {
    row_selector: Selector,
    cell_selector: Selector,
    link_selector: Selector,
}

fn selector(css: &str) -> ScraperResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::ExtractionError(format!("invalid selector '{}': {}", css, e)))
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

impl ReportParser {
    pub fn new(row_selector: &str) -> ScraperResult<Self> {
        Ok(Self {
            row_selector: selector(row_selector)?,
            cell_selector: selector("td")?,
            link_selector: selector("a")?,
        })
    }

    pub fn parse(&self, page: &RenderedPage) -> ParseOutcome {
        let document = Html::parse_document(&page.html);
        trace!("Parsing HTML content: {}", page.html);

        let mut outcome = ParseOutcome::default();
        for row in document.select(&self.row_selector) {
            outcome.rows_seen += 1;

            let cells: Vec<ElementRef> = row.select(&self.cell_selector).collect();
            if cells.len() < MIN_CELLS {
                debug!(
                    "Skipping row {} with {} cells",
                    outcome.rows_seen,
                    cells.len()
                );
                outcome.rows_dropped += 1;
                continue;
            }

            outcome.reports.push(SeismicReport {
                report_id: cell_text(&cells[0]),
                reference: cell_text(&cells[1]),
                local_date_time: cell_text(&cells[2]),
                magnitude: cell_text(&cells[3]),
                report_link: self.report_link(&cells[4], &page.url),
            });
        }

        info!("Total reports extracted: {}", outcome.reports.len());
        outcome
    }

    /// Absolute href of the first anchor in the cell, or empty.
    fn report_link(&self, cell: &ElementRef, base: &Url) -> String {
        let Some(href) = cell
            .select(&self.link_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
        else {
            return String::new();
        };

        let href = href.trim();
        match base.join(href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                debug!("Keeping unresolvable link '{}': {}", href, e);
                href.to_string()
            }
        }
    }
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_SELECTOR).expect("default selectors are valid")
    }
}
