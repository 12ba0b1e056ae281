use crate::entities::sea_orm_active_enums::Frequency;
use sea_orm::ActiveEnum;

/// Error raised when a frequency and its custom value do not agree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    /// `other` was chosen without saying how often.
    #[error("frequency_value is required when frequency is other")]
    MissingValue,
    /// A custom value was given for one of the fixed frequencies.
    #[error("frequency_value can only be set when frequency is other, not {}", .0.to_value())]
    UnexpectedValue(Frequency),
    /// The custom value must describe a real interval.
    #[error("frequency_value must be a positive integer, got {0}")]
    NonPositiveValue(i32),
}

/// A validated pair of frequency and optional custom value.
///
/// The value is present if and only if the frequency is [`Frequency::Other`],
/// and is then always positive. Both the create and the update path go
/// through [`Recurrence::new`], so a stored task can never break this rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recurrence {
    frequency: Frequency,
    value: Option<i32>,
}

impl Recurrence {
    pub fn new(frequency: Frequency, value: Option<i32>) -> Result<Self, RecurrenceError> {
        match (frequency, value) {
            (Frequency::Other, None) => Err(RecurrenceError::MissingValue),
            (Frequency::Other, Some(v)) if v <= 0 => Err(RecurrenceError::NonPositiveValue(v)),
            (Frequency::Other, Some(_)) => Ok(Self { frequency, value }),
            (_, Some(_)) => Err(RecurrenceError::UnexpectedValue(frequency)),
            (_, None) => Ok(Self { frequency, value }),
        }
    }

    /// Applies a partial change and validates the result.
    ///
    /// `value` is `None` when the caller did not mention `frequency_value` at all,
    /// and `Some(None)` when it was explicitly cleared. An unmentioned value is
    /// kept while the frequency stays `other` and dropped otherwise.
    pub fn apply(
        self,
        frequency: Option<Frequency>,
        value: Option<Option<i32>>,
    ) -> Result<Self, RecurrenceError> {
        let frequency = frequency.unwrap_or(self.frequency);
        let value = match value {
            Some(value) => value,
            None if frequency == Frequency::Other => self.value,
            None => None,
        };
        Self::new(frequency, value)
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn value(&self) -> Option<i32> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_create_custom_recurrence_with_value() {
        let recurrence = Recurrence::new(Frequency::Other, Some(5)).unwrap();
        assert_eq!(recurrence.frequency(), Frequency::Other);
        assert_eq!(recurrence.value(), Some(5));
    }

    #[test]
    fn cannot_create_custom_recurrence_without_value() {
        assert_eq!(
            Recurrence::new(Frequency::Other, None),
            Err(RecurrenceError::MissingValue)
        );
    }

    #[test]
    fn cannot_create_custom_recurrence_with_non_positive_value() {
        assert_eq!(
            Recurrence::new(Frequency::Other, Some(0)),
            Err(RecurrenceError::NonPositiveValue(0))
        );
        assert_eq!(
            Recurrence::new(Frequency::Other, Some(-3)),
            Err(RecurrenceError::NonPositiveValue(-3))
        );
    }

    #[test]
    fn cannot_give_value_to_fixed_frequencies() {
        for frequency in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            assert_eq!(
                Recurrence::new(frequency, Some(2)),
                Err(RecurrenceError::UnexpectedValue(frequency))
            );
            assert!(Recurrence::new(frequency, None).is_ok());
        }
    }

    #[test]
    fn defaults_to_monthly_without_value() {
        let recurrence = Recurrence::default();
        assert_eq!(recurrence.frequency(), Frequency::Monthly);
        assert_eq!(recurrence.value(), None);
    }

    #[test]
    fn clears_value_when_switching_away_from_other() {
        let current = Recurrence::new(Frequency::Other, Some(5)).unwrap();
        let updated = current.apply(Some(Frequency::Daily), None).unwrap();
        assert_eq!(updated, Recurrence::new(Frequency::Daily, None).unwrap());
    }

    #[test]
    fn rejects_value_sent_alongside_fixed_frequency() {
        let current = Recurrence::new(Frequency::Other, Some(5)).unwrap();
        assert_eq!(
            current.apply(Some(Frequency::Weekly), Some(Some(5))),
            Err(RecurrenceError::UnexpectedValue(Frequency::Weekly))
        );
    }

    #[test]
    fn keeps_stored_value_while_frequency_stays_other() {
        let current = Recurrence::new(Frequency::Other, Some(5)).unwrap();
        assert_eq!(current.apply(None, None), Ok(current));
        assert_eq!(current.apply(Some(Frequency::Other), None), Ok(current));
    }

    #[test]
    fn can_change_value_of_custom_recurrence() {
        let current = Recurrence::new(Frequency::Other, Some(5)).unwrap();
        let updated = current.apply(None, Some(Some(9))).unwrap();
        assert_eq!(updated.value(), Some(9));
    }

    #[test]
    fn requires_value_when_switching_to_other() {
        let current = Recurrence::default();
        assert_eq!(
            current.apply(Some(Frequency::Other), None),
            Err(RecurrenceError::MissingValue)
        );
        let updated = current
            .apply(Some(Frequency::Other), Some(Some(3)))
            .unwrap();
        assert_eq!(updated, Recurrence::new(Frequency::Other, Some(3)).unwrap());
    }

    #[test]
    fn cannot_clear_value_of_custom_recurrence() {
        let current = Recurrence::new(Frequency::Other, Some(5)).unwrap();
        assert_eq!(
            current.apply(None, Some(None)),
            Err(RecurrenceError::MissingValue)
        );
    }

    #[test]
    fn cannot_set_value_on_fixed_frequency_without_switching() {
        let current = Recurrence::new(Frequency::Yearly, None).unwrap();
        assert_eq!(
            current.apply(None, Some(Some(4))),
            Err(RecurrenceError::UnexpectedValue(Frequency::Yearly))
        );
        assert_eq!(current.apply(None, Some(None)), Ok(current));
    }
}
