/// Maximum desired output size chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    FiveMb,
    TenMb,
}

impl Target {
    pub const fn megabytes(self) -> u32 {
        match self {
            Target::FiveMb => 5,
            Target::TenMb => 10,
        }
    }

    pub const fn hint(self) -> &'static str {
        match self {
            Target::FiveMb => "maximum compression, smaller output, more aggressive quality loss",
            Target::TenMb => "balanced compression",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_five_megabytes() {
        assert_eq!(Target::default(), Target::FiveMb);
        assert_eq!(Target::default().megabytes(), 5);
        assert_eq!(Target::TenMb.megabytes(), 10);
        assert_eq!(Target::TenMb.hint(), "balanced compression");
    }
}
