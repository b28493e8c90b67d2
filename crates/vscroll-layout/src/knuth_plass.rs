//! Justified row packing for items with heterogeneous aspect ratios.
//!
//! Items are broken into rows the way a paragraph is broken into lines: a
//! dynamic program picks the break sequence with the lowest total badness,
//! then each row is justified so its cells exactly fill the row.
//!
//! The algorithm only ever sees aspect ratios, read through the accessor the
//! packer is built with. A vertical gallery passes `width / height`, a
//! horizontal one passes the inverse.

use smallvec::SmallVec;
use std::ops::Range;

use crate::LayoutError;

/// Runs whose content is below this fraction of the row count as short.
const SHORT_THRESHOLD: f32 = 0.5;

/// Rows emptier than this fraction of the row are rejected outright.
const EMPTY_THRESHOLD: f32 = 0.1;

/// Badness of a rejected row.
const REJECTED_BADNESS: f32 = 1000.0;

/// Two ratios within this factor of each other are treated as equal.
const EVEN_RATIO_TOLERANCE: f32 = 0.95;

/// Scaled cells keep at least this fraction of their minimum width.
const MIN_WIDTH_RETAINED: f32 = 0.75;

/// Run length from which the break search starts pruning.
const PRUNE_MIN_CELLS: usize = 5;

/// `(numerator, denominator, preference)` of the fractional split points a
/// row may be aligned on. A higher preference widens the capture distance.
const SNAP_POINTS: [(f32, f32, f32); 5] = [
    (1.0, 4.0, 1.0),
    (1.0, 3.0, 1.0),
    (1.0, 2.0, 1.25),
    (2.0, 3.0, 1.0),
    (3.0, 4.0, 1.0),
];

type Ratios = SmallVec<[f32; 32]>;

/// Tuning knobs for [`KnuthPlass`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnuthPlassOptions {
    /// Minimum cell size as a multiple of the target cell size.
    pub min_cell_factor: f32,
    /// Maximum cell size as a multiple of the row size.
    pub max_cell_factor: f32,
    /// Capture distance for snap points, as a fraction of the row size.
    pub snap_threshold: f32,
}

impl Default for KnuthPlassOptions {
    fn default() -> Self {
        Self {
            min_cell_factor: 0.8,
            max_cell_factor: 1.1,
            snap_threshold: 0.05,
        }
    }
}

/// Result of [`KnuthPlass::calculate_breaks`].
///
/// `breaks[r]` is the index of the last item in row `r`; `sizes[r]` is the
/// unscaled content size of that row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowBreaks {
    pub breaks: Vec<usize>,
    pub sizes: Vec<f32>,
}

impl RowBreaks {
    pub fn row_count(&self) -> usize {
        self.breaks.len()
    }

    /// Item ranges and content sizes, row by row.
    pub fn rows(&self) -> impl Iterator<Item = (Range<usize>, f32)> + '_ {
        let mut start = 0;
        self.breaks
            .iter()
            .zip(self.sizes.iter())
            .map(move |(&last, &size)| {
                let range = start..last + 1;
                start = last + 1;
                (range, size)
            })
    }
}

/// Row packer parameterized by an aspect ratio accessor.
pub struct KnuthPlass<F> {
    aspect_ratio: F,
    options: KnuthPlassOptions,
}

impl<F> KnuthPlass<F> {
    pub fn new(aspect_ratio: F) -> Self {
        Self {
            aspect_ratio,
            options: KnuthPlassOptions::default(),
        }
    }

    pub fn with_options(mut self, options: KnuthPlassOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &KnuthPlassOptions {
        &self.options
    }

    fn ratios<T>(&self, items: &[T]) -> Result<Ratios, LayoutError>
    where
        F: Fn(&T) -> f32,
    {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let value = (self.aspect_ratio)(item);
                if value.is_finite() && value > 0.0 {
                    Ok(value)
                } else {
                    Err(LayoutError::InvalidAspectRatio { index, value })
                }
            })
            .collect()
    }

    /// Splits `items` into rows of roughly `target_cell_size` thickness that
    /// fill `row_size`.
    ///
    /// A run of five or more cells stops extending once the remaining space is
    /// under half its content. This bounds the search but can miss the optimal
    /// break sequence for pathological ratio distributions.
    pub fn calculate_breaks<T>(
        &self,
        items: &[T],
        row_size: f32,
        gap: f32,
        target_cell_size: f32,
    ) -> Result<RowBreaks, LayoutError>
    where
        F: Fn(&T) -> f32,
    {
        let ratios = self.ratios(items)?;
        Ok(break_rows(
            &ratios,
            row_size,
            gap,
            target_cell_size,
            &self.options,
        ))
    }

    /// Sizes the cells of one row spanning `[start, end]`.
    ///
    /// `content_size` is the row's unscaled content as reported by
    /// [`calculate_breaks`](Self::calculate_breaks). Unless the row is short,
    /// the returned sizes plus the gaps close the span exactly.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_row_layout<T>(
        &self,
        items: &[T],
        content_size: f32,
        row_size: f32,
        start: f32,
        end: f32,
        gap: f32,
        cell_size: f32,
        snap_threshold: f32,
    ) -> Result<Vec<f32>, LayoutError>
    where
        F: Fn(&T) -> f32,
    {
        let ratios = self.ratios(items)?;
        let row = RowSpec {
            row_size,
            gap,
            cell_size,
            min_cell_factor: self.options.min_cell_factor,
            max_cell_factor: self.options.max_cell_factor,
        };
        let mut widths = Vec::with_capacity(ratios.len());
        row.layout(&ratios, content_size, start, end, snap_threshold, &mut widths);
        Ok(widths)
    }
}

/// Rounds half-way cases toward positive infinity.
#[inline]
fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

fn size_delta(target: f32, actual: f32) -> f32 {
    let delta = (actual - target) / actual.min(target);
    delta * delta
}

fn badness(available: f32, content: f32, is_last: bool, last_line_penalty: f32) -> f32 {
    if content < available * EMPTY_THRESHOLD {
        return REJECTED_BADNESS;
    }
    let mut badness = size_delta(available, content);
    if content < available * SHORT_THRESHOLD {
        if is_last {
            badness *= last_line_penalty;
        } else {
            badness += (available - content) / available;
        }
    }
    badness
}

/// Penalty multiplier for a short last row, growing with how many trailing
/// items would fit on one row.
fn short_last_line_penalty(ratios: &[f32], row_size: f32, cell_size: f32) -> f32 {
    if ratios.is_empty() || row_size <= 0.0 || cell_size <= 0.0 {
        return 0.0;
    }
    // Tiny cells saturate the cast; the doubling must not overflow.
    let max_cells = ((row_size / cell_size).ceil() as usize).saturating_mul(2).max(1);
    let limit = max_cells.min(ratios.len() - 1);
    let mut fitted = 0;
    while fitted <= limit {
        let ratio = ratios[ratios.len() - 1 - fitted];
        if ratio * cell_size >= row_size {
            break;
        }
        fitted += 1;
    }
    let fraction = fitted as f32 / max_cells as f32;
    fraction * fraction
}

fn break_rows(
    ratios: &[f32],
    row_size: f32,
    gap: f32,
    cell_size: f32,
    options: &KnuthPlassOptions,
) -> RowBreaks {
    let count = ratios.len();
    if count == 0 {
        return RowBreaks::default();
    }

    let min_cell = cell_size * options.min_cell_factor;
    let max_cell = row_size * options.max_cell_factor;
    let last_line_penalty = short_last_line_penalty(ratios, row_size, cell_size);

    let mut totals = Vec::with_capacity(count);
    let mut running = 0.0;
    for ratio in ratios {
        running += (ratio * cell_size).min(max_cell).max(min_cell);
        totals.push(running);
    }

    let mut best_badness = vec![0.0f32; count];
    // Index of the last item of the previous row, or `None` for the first row.
    let mut best_break: Vec<Option<usize>> = vec![None; count];

    for i in 0..count {
        let is_last = i == count - 1;
        let content = if i == 0 {
            totals[0]
        } else {
            totals[i] - totals[i - 1]
        };
        let previous = if i == 0 { 0.0 } else { best_badness[i - 1] };
        let mut best = previous + badness(row_size, content, is_last, last_line_penalty);
        let mut best_at = i.checked_sub(1);

        let mut available = row_size;
        // Candidate rows spanning `j + 1 ..= i`, `j = None` meaning from item 0.
        let mut j = i.checked_sub(1);
        while let Some(current) = j {
            available -= gap;
            if available <= 0.0 {
                break;
            }
            let previous_row = current.checked_sub(1);
            let content = match previous_row {
                Some(p) => totals[i] - totals[p],
                None => totals[i],
            };
            let cells = i - current + 1;
            if cells >= PRUNE_MIN_CELLS && available * 2.0 < content {
                break;
            }
            let before = previous_row.map_or(0.0, |p| best_badness[p]);
            let candidate = before + badness(available, content, is_last, last_line_penalty);
            if candidate < best {
                best = candidate;
                best_at = previous_row;
            }
            j = previous_row;
        }

        best_badness[i] = best;
        best_break[i] = best_at;
    }

    let mut breaks = Vec::new();
    let mut cursor = Some(count - 1);
    while let Some(current) = cursor {
        breaks.push(current);
        cursor = best_break[current];
    }
    breaks.reverse();

    let mut sizes = Vec::with_capacity(breaks.len());
    let mut previous = None;
    for &last in &breaks {
        let size = match previous {
            Some(p) => totals[last] - totals[p],
            None => totals[last],
        };
        sizes.push(size);
        previous = Some(last);
    }

    log::trace!(
        "knuth-plass: {} items into {} rows of {}",
        count,
        breaks.len(),
        row_size
    );
    RowBreaks { breaks, sizes }
}

struct RowSpec {
    row_size: f32,
    gap: f32,
    cell_size: f32,
    min_cell_factor: f32,
    max_cell_factor: f32,
}

impl RowSpec {
    fn layout(
        &self,
        ratios: &[f32],
        content: f32,
        start: f32,
        end: f32,
        snap_threshold: f32,
        out: &mut Vec<f32>,
    ) {
        let count = ratios.len();
        if count == 0 {
            return;
        }
        let gap = self.gap;
        let min_cell = self.cell_size * self.min_cell_factor;
        let max_cell = self.row_size * self.max_cell_factor;

        let (min_ratio, max_ratio) = ratios
            .iter()
            .fold((f32::INFINITY, 0.0f32), |(lo, hi), &r| (lo.min(r), hi.max(r)));

        let available = (end - start) - (count - 1) as f32 * gap;
        let short_size = available * SHORT_THRESHOLD;
        let is_short = content < short_size;

        let mut subdivisions = 0;
        if min_ratio > EVEN_RATIO_TOLERANCE * max_ratio {
            subdivisions = count;
            if is_short && content > 0.0 {
                let average = content / count as f32;
                let fit = (available / average).floor() as usize;
                if fit >= count {
                    subdivisions = if size_delta(available, average * fit as f32)
                        < size_delta(available, average * (fit + 1) as f32)
                    {
                        fit
                    } else {
                        fit + 1
                    };
                }
                if average * (subdivisions as f32) < short_size {
                    subdivisions = 0;
                }
            }
        }

        if subdivisions > 0 {
            let even = available / subdivisions as f32;
            let mut x = start;
            let mut width = 0.0;
            for i in 0..count {
                width = round_half_up(start + i as f32 * gap + (i + 1) as f32 * even) - x;
                out.push(width);
                x += width + gap;
            }
            if subdivisions == count {
                if let Some(last) = out.last_mut() {
                    *last = end - (x - width - gap);
                }
            }
            return;
        }

        if is_short {
            out.extend(ratios.iter().map(|r| (r * self.cell_size).floor()));
            return;
        }

        let mut totals: Ratios = SmallVec::with_capacity(count);
        let mut running = 0.0;
        for ratio in ratios {
            running += (ratio * self.cell_size).min(max_cell).max(min_cell);
            totals.push(running);
        }

        let (min_total, scale) = if content < available {
            let min_total = min_cell * count as f32 * MIN_WIDTH_RETAINED;
            (min_total, (available - min_total) / (content - min_total))
        } else {
            (0.0, available / content)
        };
        let min_per_cell = min_total / count as f32;
        let cell_end = |i: usize| {
            let retained = min_per_cell * (i + 1) as f32;
            start + retained + i as f32 * gap + scale * (totals[i] - retained)
        };

        let mut best_delta = snap_threshold * self.row_size;
        let mut best: Option<(usize, f32)> = None;
        for i in 0..count - 1 {
            let position = cell_end(i);
            for (numerator, denominator, preference) in SNAP_POINTS {
                let snap = round_half_up(
                    numerator / denominator * (self.row_size - (denominator - 1.0) * gap)
                        + (numerator - 1.0) * gap,
                );
                let delta = (position - snap).abs() / preference;
                if delta < best_delta {
                    best_delta = delta;
                    best = Some((i, snap));
                }
            }
        }

        if let Some((split, snap)) = best {
            let span = end - start;
            let left_fraction = (snap - start) / span;
            let right_fraction = (end - snap) / span;
            let left_threshold = snap_threshold * left_fraction * (2.0 - left_fraction);
            let right_threshold = snap_threshold * right_fraction * (2.0 - right_fraction);
            self.layout(
                &ratios[..=split],
                totals[split],
                start,
                snap,
                left_threshold,
                out,
            );
            self.layout(
                &ratios[split + 1..],
                totals[count - 1] - totals[split],
                snap + gap,
                end,
                right_threshold,
                out,
            );
            return;
        }

        let mut x = start;
        for i in 0..count - 1 {
            let width = round_half_up(cell_end(i)) - x;
            out.push(width);
            x += width + gap;
        }
        out.push(end - x);
    }
}
