//! Unfinalized generator shapes.

use curvestack_math::interpolation::Interpolation;
use curvestack_math::parametric::NelsonSiegel;
use tracing::debug;

use super::bound::BoundShape;
use super::CurveGenerator;
use crate::error::{CurveError, CurveResult};
use crate::traits::{CurveLookup, CurveRef};

/// Configuration-only description of a curve generator.
///
/// Leaf shapes whose nodes come from calibration instruments must be
/// finalized before they can report a parameter count or generate a curve.
/// Shapes that need no instruments (constant, Nelson-Siegel, pre-bound) work
/// directly.
///
/// # Anchors in stacks
///
/// When a stack is finalized, every member after the first receives the last
/// instrument consumed by the previous member as an extra anchor instrument.
/// An [`AnchoredZero`](CurveShape::AnchoredZero) or
/// [`AnchoredDiscount`](CurveShape::AnchoredDiscount) member places its fixed
/// node at that instrument's time; all other members ignore it. A standalone
/// anchored shape consumes its own first instrument as the anchor.
///
/// # Explicit counts
///
/// [`AdditiveStackFixed`](CurveShape::AdditiveStackFixed) assigns instruments
/// by its counts, and a member that already knows its parameter count must
/// be assigned exactly that many.
#[derive(Debug, Clone)]
pub enum CurveShape {
    /// One continuously-compounded rate.
    Constant,
    /// Zero rates interpolated between instrument node times.
    InterpolatedZero {
        /// Interpolation on zero rates.
        interpolation: Interpolation,
    },
    /// Discount factors interpolated between instrument node times.
    InterpolatedDiscount {
        /// Interpolation on discount factors.
        interpolation: Interpolation,
    },
    /// Discount factors on a declared number of instrument nodes. The count
    /// is known before finalization, so the shape can lead an inferred stack.
    InterpolatedDiscountNumber {
        /// Number of nodes, and of instruments consumed.
        count: usize,
        /// Interpolation on discount factors.
        interpolation: Interpolation,
    },
    /// Periodically-compounded zero rates between instrument node times.
    PeriodicZero {
        /// Interpolation on periodic rates.
        interpolation: Interpolation,
        /// Compounding periods per year.
        periods_per_year: u32,
    },
    /// Zero rates pinned to zero at an anchor instrument's time.
    AnchoredZero {
        /// Interpolation on zero rates.
        interpolation: Interpolation,
    },
    /// Discount factors pinned to one at an anchor instrument's time.
    AnchoredDiscount {
        /// Interpolation on discount factors.
        interpolation: Interpolation,
    },
    /// Nelson-Siegel with parameters `[β₀, β₁, β₂, τ]`.
    NelsonSiegel,
    /// Additive stack; every member but the last must know its parameter
    /// count before finalization, the last takes the remaining instruments.
    AdditiveStack {
        /// Members, first one always added.
        members: Vec<CurveShape>,
        /// Subtract all members but the first.
        subtract: bool,
    },
    /// Additive stack with explicit instrument counts per member.
    AdditiveStackFixed {
        /// Members, first one always added.
        members: Vec<CurveShape>,
        /// Instruments assigned to each member.
        instrument_counts: Vec<usize>,
        /// Subtract all members but the first.
        subtract: bool,
    },
    /// Spread over a curve looked up by name at generation time.
    SpreadOverExisting {
        /// Generator of the spread.
        member: Box<CurveShape>,
        /// Compute `existing - spread` instead of `existing + spread`.
        subtract: bool,
        /// Name of the existing curve.
        existing: String,
    },
    /// Spread over a curve supplied at construction.
    SpreadOverFixed {
        /// Generator of the spread.
        member: Box<CurveShape>,
        /// Compute `spread - fixed` instead of `spread + fixed`.
        subtract: bool,
        /// The fixed curve.
        fixed: CurveRef,
    },
    /// A generator that is already bound to its nodes.
    Bound(Box<BoundShape>),
}

impl CurveShape {
    /// Interpolated zero-rate shape.
    #[must_use]
    pub fn interpolated_zero(interpolation: Interpolation) -> Self {
        Self::InterpolatedZero { interpolation }
    }

    /// Interpolated discount-factor shape.
    #[must_use]
    pub fn interpolated_discount(interpolation: Interpolation) -> Self {
        Self::InterpolatedDiscount { interpolation }
    }

    /// Discount-factor shape over exactly `count` instruments.
    #[must_use]
    pub fn interpolated_discount_number(count: usize, interpolation: Interpolation) -> Self {
        Self::InterpolatedDiscountNumber {
            count,
            interpolation,
        }
    }

    /// Periodically-compounded zero-rate shape.
    #[must_use]
    pub fn periodic_zero(periods_per_year: u32, interpolation: Interpolation) -> Self {
        Self::PeriodicZero {
            interpolation,
            periods_per_year,
        }
    }

    /// Anchored zero-rate shape.
    #[must_use]
    pub fn anchored_zero(interpolation: Interpolation) -> Self {
        Self::AnchoredZero { interpolation }
    }

    /// Anchored discount-factor shape.
    #[must_use]
    pub fn anchored_discount(interpolation: Interpolation) -> Self {
        Self::AnchoredDiscount { interpolation }
    }

    /// Additive stack with inferred instrument counts.
    #[must_use]
    pub fn additive_stack(members: Vec<CurveShape>, subtract: bool) -> Self {
        Self::AdditiveStack { members, subtract }
    }

    /// Additive stack with explicit instrument counts.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no members, the counts do not match
    /// the members one to one, or a member that knows its parameter count is
    /// assigned a different number of instruments.
    pub fn additive_stack_with_counts(
        members: Vec<CurveShape>,
        instrument_counts: Vec<usize>,
        subtract: bool,
    ) -> CurveResult<Self> {
        check_member_counts(&members, &instrument_counts)?;
        Ok(Self::AdditiveStackFixed {
            members,
            instrument_counts,
            subtract,
        })
    }

    /// Spread over a named existing curve.
    #[must_use]
    pub fn spread_over_existing(
        member: CurveShape,
        subtract: bool,
        existing: impl Into<String>,
    ) -> Self {
        Self::SpreadOverExisting {
            member: Box::new(member),
            subtract,
            existing: existing.into(),
        }
    }

    /// Spread over a fixed curve.
    #[must_use]
    pub fn spread_over_fixed(member: CurveShape, subtract: bool, fixed: CurveRef) -> Self {
        Self::SpreadOverFixed {
            member: Box::new(member),
            subtract,
            fixed,
        }
    }

    /// Short name of the generator kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::InterpolatedZero { .. } => "interpolated_zero",
            Self::InterpolatedDiscount { .. } => "interpolated_discount",
            Self::InterpolatedDiscountNumber { .. } => "interpolated_discount_number",
            Self::PeriodicZero { .. } => "periodic_zero",
            Self::AnchoredZero { .. } => "anchored_zero",
            Self::AnchoredDiscount { .. } => "anchored_discount",
            Self::NelsonSiegel => "nelson_siegel",
            Self::AdditiveStack { .. } => "additive_stack",
            Self::AdditiveStackFixed { .. } => "additive_stack_fixed",
            Self::SpreadOverExisting { .. } => "spread_over_existing",
            Self::SpreadOverFixed { .. } => "spread_over_fixed",
            Self::Bound(bound) => bound.kind(),
        }
    }

    /// Converts a shape that needs no instruments into a bound shape.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnsupportedOperation`] if any part of the shape
    /// takes its nodes from calibration instruments.
    pub fn to_bound(&self) -> CurveResult<BoundShape> {
        self.resolve("to_bound")
    }

    fn resolve(&self, operation: &str) -> CurveResult<BoundShape> {
        match self {
            Self::Constant => Ok(BoundShape::Constant),
            Self::NelsonSiegel => Ok(BoundShape::NelsonSiegel),
            Self::Bound(bound) => Ok((**bound).clone()),
            Self::InterpolatedZero { .. }
            | Self::InterpolatedDiscount { .. }
            | Self::InterpolatedDiscountNumber { .. }
            | Self::PeriodicZero { .. }
            | Self::AnchoredZero { .. }
            | Self::AnchoredDiscount { .. } => Err(self.needs_instruments(operation)),
            Self::AdditiveStack { members, subtract } => {
                resolve_members(members, *subtract, operation)
            }
            Self::AdditiveStackFixed {
                members,
                instrument_counts,
                subtract,
            } => {
                check_member_counts(members, instrument_counts)?;
                resolve_members(members, *subtract, operation)
            }
            Self::SpreadOverExisting {
                member,
                subtract,
                existing,
            } => Ok(BoundShape::spread_over_existing(
                member.resolve(operation)?,
                *subtract,
                existing.clone(),
            )),
            Self::SpreadOverFixed {
                member,
                subtract,
                fixed,
            } => Ok(BoundShape::spread_over_fixed(
                member.resolve(operation)?,
                *subtract,
                fixed.clone(),
            )),
        }
    }

    fn needs_instruments(&self, operation: &str) -> CurveError {
        CurveError::unsupported(
            operation,
            format!(
                "{} generator takes its nodes from calibration instruments; finalize it first",
                self.kind()
            ),
        )
    }

    /// Binds the shape to `instruments`, with an optional anchor instrument
    /// handed over from a preceding stack member.
    fn bind<I>(
        &self,
        instruments: &[I],
        anchor: Option<&I>,
        node_time: &dyn Fn(&I) -> f64,
    ) -> CurveResult<BoundShape> {
        let times = |items: &[I]| items.iter().map(node_time).collect::<Vec<_>>();
        match self {
            Self::Constant => Ok(BoundShape::Constant),
            Self::NelsonSiegel => Ok(BoundShape::NelsonSiegel),
            Self::Bound(bound) => Ok((**bound).clone()),
            Self::InterpolatedZero { interpolation } => {
                BoundShape::interpolated_zero(times(instruments), *interpolation)
            }
            Self::InterpolatedDiscount { interpolation } => {
                BoundShape::interpolated_discount(times(instruments), *interpolation)
            }
            Self::InterpolatedDiscountNumber {
                count,
                interpolation,
            } => {
                if instruments.len() != *count {
                    return Err(CurveError::instrument_count_mismatch(*count, instruments.len()));
                }
                BoundShape::interpolated_discount(times(instruments), *interpolation)
            }
            Self::PeriodicZero {
                interpolation,
                periods_per_year,
            } => BoundShape::periodic_zero(times(instruments), *periods_per_year, *interpolation),
            Self::AnchoredZero { interpolation } => {
                let (anchor, real) = split_anchor(instruments, anchor)?;
                BoundShape::anchored_zero(node_time(anchor), times(real), *interpolation)
            }
            Self::AnchoredDiscount { interpolation } => {
                let (anchor, real) = split_anchor(instruments, anchor)?;
                BoundShape::anchored_discount(node_time(anchor), times(real), *interpolation)
            }
            Self::AdditiveStack { members, subtract } => {
                let counts = inferred_counts(members, instruments.len())?;
                bind_members(members, &counts, *subtract, instruments, anchor, node_time)
            }
            Self::AdditiveStackFixed {
                members,
                instrument_counts,
                subtract,
            } => {
                check_member_counts(members, instrument_counts)?;
                let total: usize = instrument_counts.iter().sum();
                if total != instruments.len() {
                    return Err(CurveError::instrument_count_mismatch(total, instruments.len()));
                }
                bind_members(members, instrument_counts, *subtract, instruments, anchor, node_time)
            }
            Self::SpreadOverExisting {
                member,
                subtract,
                existing,
            } => Ok(BoundShape::spread_over_existing(
                member.bind(instruments, anchor, node_time)?,
                *subtract,
                existing.clone(),
            )),
            Self::SpreadOverFixed {
                member,
                subtract,
                fixed,
            } => Ok(BoundShape::spread_over_fixed(
                member.bind(instruments, anchor, node_time)?,
                *subtract,
                fixed.clone(),
            )),
        }
    }
}

/// The handed-over anchor if there is one, otherwise the first instrument.
fn split_anchor<'a, I>(
    instruments: &'a [I],
    anchor: Option<&'a I>,
) -> CurveResult<(&'a I, &'a [I])> {
    match (anchor, instruments.split_first()) {
        (Some(anchor), _) => Ok((anchor, instruments)),
        (None, Some((first, rest))) => Ok((first, rest)),
        (None, None) => Err(CurveError::InsufficientNodes {
            required: 1,
            got: 0,
        }),
    }
}

fn resolve_members(
    members: &[CurveShape],
    subtract: bool,
    operation: &str,
) -> CurveResult<BoundShape> {
    BoundShape::additive_stack(
        members
            .iter()
            .map(|m| m.resolve(operation))
            .collect::<CurveResult<_>>()?,
        subtract,
    )
}

/// Explicit counts must pair up with the members and agree with every
/// member that already knows its parameter count.
fn check_member_counts(members: &[CurveShape], counts: &[usize]) -> CurveResult<()> {
    if members.is_empty() {
        return Err(CurveError::invalid_input(
            "an additive stack needs at least one member",
        ));
    }
    if members.len() != counts.len() {
        return Err(CurveError::invalid_input(format!(
            "{} instrument counts for {} stack members",
            counts.len(),
            members.len()
        )));
    }
    for (member, &count) in members.iter().zip(counts) {
        // members still waiting for instruments take whatever they are given
        if let Ok(declared) = member.number_of_parameters() {
            if declared != count {
                return Err(CurveError::instrument_count_mismatch(declared, count));
            }
        }
    }
    Ok(())
}

/// Instrument counts of an inferred stack: every member but the last
/// declares its count, the last takes the rest.
fn inferred_counts(members: &[CurveShape], available: usize) -> CurveResult<Vec<usize>> {
    let Some((_, leading)) = members.split_last() else {
        return Err(CurveError::invalid_input(
            "an additive stack needs at least one member",
        ));
    };
    let mut counts = leading
        .iter()
        .map(CurveGenerator::number_of_parameters)
        .collect::<CurveResult<Vec<_>>>()?;
    let used: usize = counts.iter().sum();
    if used > available {
        return Err(CurveError::instrument_count_mismatch(used, available));
    }
    counts.push(available - used);
    Ok(counts)
}

fn bind_members<I>(
    members: &[CurveShape],
    counts: &[usize],
    subtract: bool,
    instruments: &[I],
    anchor: Option<&I>,
    node_time: &dyn Fn(&I) -> f64,
) -> CurveResult<BoundShape> {
    let mut start = 0;
    let mut bound = Vec::with_capacity(members.len());
    for (member, &count) in members.iter().zip(counts) {
        // the previous member's last instrument anchors the next member
        let member_anchor = match start {
            0 => anchor,
            _ => Some(&instruments[start - 1]),
        };
        bound.push(member.bind(&instruments[start..start + count], member_anchor, node_time)?);
        start += count;
    }
    BoundShape::additive_stack(bound, subtract)
}

impl CurveGenerator for CurveShape {
    fn number_of_parameters(&self) -> CurveResult<usize> {
        match self {
            Self::Constant => Ok(1),
            Self::NelsonSiegel => Ok(NelsonSiegel::PARAMETER_COUNT),
            Self::Bound(bound) => Ok(bound.parameter_count()),
            Self::InterpolatedDiscountNumber { count, .. } => Ok(*count),
            Self::InterpolatedZero { .. }
            | Self::InterpolatedDiscount { .. }
            | Self::PeriodicZero { .. }
            | Self::AnchoredZero { .. }
            | Self::AnchoredDiscount { .. } => Err(self.needs_instruments("number_of_parameters")),
            Self::AdditiveStack { members, .. } => members
                .iter()
                .map(CurveGenerator::number_of_parameters)
                .sum(),
            Self::AdditiveStackFixed {
                members,
                instrument_counts,
                ..
            } => {
                check_member_counts(members, instrument_counts)?;
                Ok(instrument_counts.iter().sum())
            }
            Self::SpreadOverExisting { member, .. } | Self::SpreadOverFixed { member, .. } => {
                member.number_of_parameters()
            }
        }
    }

    fn finalize<I, F>(&self, instruments: &[I], node_time: F) -> CurveResult<BoundShape>
    where
        F: Fn(&I) -> f64,
    {
        let bound = self.bind(instruments, None, &node_time)?;
        debug!(
            generator = self.kind(),
            instruments = instruments.len(),
            parameters = bound.parameter_count(),
            "generator finalized"
        );
        Ok(bound)
    }

    fn generate_with(
        &self,
        name: &str,
        parameters: &[f64],
        lookup: Option<&dyn CurveLookup>,
    ) -> CurveResult<CurveRef> {
        self.resolve("generate")?.generate_with(name, parameters, lookup)
    }

    fn initial_guess(&self, market_rates: &[f64]) -> CurveResult<Vec<f64>> {
        self.resolve("initial_guess")?.initial_guess(market_rates)
    }
}
