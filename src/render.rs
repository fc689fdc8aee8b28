// Render layer.
// The core hands already-validated data to a `Renderer`; `TerminalRenderer`
// prints it as plain text for the command line front end.

use std::io::{self, Write};

use crate::compare::{CompareList, ComparisonTarget, MAX_COMPARE};
use crate::error::{Notice, Severity};
use crate::models::{CarDetailResponse, FilterOptions, ListingSummary, PageResult, StatsSnapshot};
use crate::pagination::PaginationControl;
use crate::suggest::Suggestion;

pub trait Renderer {
    fn render_results(&mut self, result: &PageResult, pagination: &PaginationControl) -> io::Result<()>;
    fn render_details(&mut self, details: &CarDetailResponse) -> io::Result<()>;
    fn render_filters(&mut self, options: &FilterOptions) -> io::Result<()>;
    fn render_compare_state(&mut self, list: &CompareList) -> io::Result<()>;
    fn render_comparison_target(&mut self, target: &ComparisonTarget) -> io::Result<()>;
    fn render_suggestions(&mut self, suggestions: &[Suggestion]) -> io::Result<()>;
    fn render_stats(&mut self, stats: &StatsSnapshot) -> io::Result<()>;
    fn render_notice(&mut self, notice: &Notice) -> io::Result<()>;
}

/// Groups the integer part of `value` in thousands: `1234567.8` -> `1,234,568`.
pub fn format_number(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub struct TerminalRenderer<W> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn listing_line(&mut self, car: &ListingSummary) -> io::Result<()> {
        let price = car.price.map_or_else(|| "-".to_string(), format_number);
        let year = car.year.map_or_else(|| "-".to_string(), |y| y.to_string());
        writeln!(
            self.out,
            "#{:<5} {:<28} {:>4}  {:<10} {:<10} {:>10}",
            car.id,
            car.name,
            year,
            car.fuel_type.as_deref().unwrap_or("-"),
            car.transmission.as_deref().unwrap_or("-"),
            price
        )
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_results(&mut self, result: &PageResult, pagination: &PaginationControl) -> io::Result<()> {
        if result.items.is_empty() {
            writeln!(self.out, "No cars available. Try changing the search criteria.")?;
        }
        for car in &result.items {
            self.listing_line(car)?;
        }
        if pagination.is_empty() {
            return Ok(());
        }

        let mut line = String::new();
        if let Some(previous) = pagination.previous {
            line.push_str(&format!("< {previous}  "));
        }
        for page in &pagination.window {
            if *page == pagination.current {
                line.push_str(&format!("[{page}] "));
            } else {
                line.push_str(&format!("{page} "));
            }
        }
        if let Some(next) = pagination.next {
            line.push_str(&format!(" {next} >"));
        }
        writeln!(self.out, "{}", line.trim_end())
    }

    fn render_details(&mut self, details: &CarDetailResponse) -> io::Result<()> {
        let car = &details.car;
        let listing = &car.listing;
        writeln!(self.out, "{}", listing.name)?;
        writeln!(
            self.out,
            "{} {} {}",
            listing.brand.as_deref().unwrap_or(""),
            listing.model.as_deref().unwrap_or(""),
            listing.year.map(|y| y.to_string()).unwrap_or_default()
        )?;
        if let Some(price) = listing.price {
            writeln!(self.out, "Price: {}", format_number(price))?;
        }
        let specs = [
            ("Fuel", listing.fuel_type.clone()),
            ("Transmission", listing.transmission.clone()),
            ("Engine", car.engine_size.map(|e| format!("{e} L"))),
            ("Doors", car.doors.map(|d| d.to_string())),
            ("Mileage", car.mileage.map(|m| format!("{} km", format_number(m as f64)))),
            ("Color", car.color.clone()),
        ];
        for (label, value) in specs {
            if let Some(value) = value {
                writeln!(self.out, "  {label}: {value}")?;
            }
        }
        let features = car.features();
        if !features.is_empty() {
            writeln!(self.out, "Features: {}", features.join(", "))?;
        }
        if let Some(description) = &listing.description {
            writeln!(self.out, "{description}")?;
        }
        if !details.similar_cars.is_empty() {
            writeln!(self.out, "Similar cars:")?;
            for similar in &details.similar_cars {
                self.listing_line(similar)?;
            }
        }
        Ok(())
    }

    fn render_filters(&mut self, options: &FilterOptions) -> io::Result<()> {
        let facets = [
            ("brand", &options.brands),
            ("fuel_type", &options.fuel_types),
            ("transmission", &options.transmissions),
            ("car_type", &options.car_types),
            ("performance_level", &options.performance_levels),
        ];
        for (name, values) in facets {
            if !values.is_empty() {
                writeln!(self.out, "{name}: {}", values.join(", "))?;
            }
        }
        if let Some(range) = options.price_range {
            writeln!(self.out, "price: {} - {}", format_number(range.min), format_number(range.max))?;
        }
        if let Some(range) = options.year_range {
            writeln!(self.out, "year: {} - {}", range.min, range.max)?;
        }
        for sort in &options.sort_options {
            writeln!(self.out, "sort_by={} ({})", sort.value, sort.label)?;
        }
        Ok(())
    }

    fn render_compare_state(&mut self, list: &CompareList) -> io::Result<()> {
        if list.is_empty() {
            return writeln!(self.out, "Comparison list is empty");
        }
        writeln!(
            self.out,
            "Comparing ({}/{}): {}",
            list.len(),
            MAX_COMPARE,
            list.ids().join(", ")
        )
    }

    fn render_comparison_target(&mut self, target: &ComparisonTarget) -> io::Result<()> {
        writeln!(self.out, "{}", target.path())
    }

    fn render_suggestions(&mut self, suggestions: &[Suggestion]) -> io::Result<()> {
        for suggestion in suggestions {
            let line: String = suggestion
                .segments
                .iter()
                .map(|s| if s.matched { format!("*{}*", s.text) } else { s.text.clone() })
                .collect();
            writeln!(self.out, "  {line}")?;
        }
        Ok(())
    }

    fn render_stats(&mut self, stats: &StatsSnapshot) -> io::Result<()> {
        for (name, value) in &stats.0 {
            writeln!(self.out, "{name}: {}", format_number(*value))?;
        }
        Ok(())
    }

    fn render_notice(&mut self, notice: &Notice) -> io::Result<()> {
        let tag = match notice.severity {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "error",
        };
        writeln!(self.out, "[{tag}] {}", notice.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::render_pagination;

    fn render_to_string(f: impl FnOnce(&mut TerminalRenderer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        f(&mut renderer).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(950.0), "950");
        assert_eq!(format_number(12500.0), "12,500");
        assert_eq!(format_number(1234567.8), "1,234,568");
        assert_eq!(format_number(-4200.0), "-4,200");
    }

    #[test]
    fn results_show_pagination_line() {
        let result = PageResult {
            items: Vec::new(),
            total: Some(60),
            page: 3,
            pages: 5,
            has_prev: true,
            has_next: true,
        };
        let output = render_to_string(|r| r.render_results(&result, &render_pagination(&result)));
        assert!(output.contains("No cars available"));
        assert!(output.ends_with("< 2  1 2 [3] 4 5  4 >\n"));
    }

    #[test]
    fn notice_is_tagged_by_severity() {
        let output = render_to_string(|r| {
            r.render_notice(&Notice::new("You can compare up to 4 cars", Severity::Warning))
        });
        assert_eq!(output, "[warning] You can compare up to 4 cars\n");
    }
}
