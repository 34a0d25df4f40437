/// One seven-segment cell. Segment naming is the standard clockwise layout:
/// `a` top, `b` upper right, `c` lower right, `d` bottom, `e` lower left,
/// `f` upper left, `g` middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit {
    pub a: bool,
    pub b: bool,
    pub c: bool,
    pub d: bool,
    pub e: bool,
    pub f: bool,
    pub g: bool,
}

impl Digit {
    pub const BLANK: Self = Self {
        a: false,
        b: false,
        c: false,
        d: false,
        e: false,
        f: false,
        g: false,
    };

    pub const DASH: Self = Self {
        a: false,
        b: false,
        c: false,
        d: false,
        e: false,
        f: false,
        g: true,
    };

    const ZERO: Self = Self {
        a: true,
        b: true,
        c: true,
        d: true,
        e: true,
        f: true,
        g: false,
    };

    const ONE: Self = Self {
        a: false,
        b: true,
        c: true,
        d: false,
        e: false,
        f: false,
        g: false,
    };

    const TWO: Self = Self {
        a: true,
        b: true,
        c: false,
        d: true,
        e: true,
        f: false,
        g: true,
    };

    const THREE: Self = Self {
        a: true,
        b: true,
        c: true,
        d: true,
        e: false,
        f: false,
        g: true,
    };

    const FOUR: Self = Self {
        a: false,
        b: true,
        c: true,
        d: false,
        e: false,
        f: true,
        g: true,
    };

    const FIVE: Self = Self {
        a: true,
        b: false,
        c: true,
        d: true,
        e: false,
        f: true,
        g: true,
    };

    const SIX: Self = Self {
        a: true,
        b: false,
        c: true,
        d: true,
        e: true,
        f: true,
        g: true,
    };

    const SEVEN: Self = Self {
        a: true,
        b: true,
        c: true,
        d: false,
        e: false,
        f: false,
        g: false,
    };

    const EIGHT: Self = Self {
        a: true,
        b: true,
        c: true,
        d: true,
        e: true,
        f: true,
        g: true,
    };

    const NINE: Self = Self {
        a: true,
        b: true,
        c: true,
        d: true,
        e: false,
        f: true,
        g: true,
    };

    pub const fn from_num(x: u8) -> Self {
        match x {
            0 => Self::ZERO,
            1 => Self::ONE,
            2 => Self::TWO,
            3 => Self::THREE,
            4 => Self::FOUR,
            5 => Self::FIVE,
            6 => Self::SIX,
            7 => Self::SEVEN,
            8 => Self::EIGHT,
            9 => Self::NINE,
            _ => Self::DASH,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_one_lights_right_side_only() {
        let one = Digit::from_num(1);
        assert!(one.b && one.c);
        assert!(!one.a && !one.d && !one.e && !one.f && !one.g);
    }

    #[test]
    fn test_eight_lights_everything() {
        let eight = Digit::from_num(8);
        assert!(eight.a && eight.b && eight.c && eight.d && eight.e && eight.f && eight.g);
    }

    #[test]
    fn test_digits_are_distinct() {
        let digits: Vec<_> = (0..=9).map(Digit::from_num).collect();
        for (i, a) in digits.iter().enumerate() {
            for (j, b) in digits.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "digits {i} and {j} share a pattern");
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_is_dash() {
        assert_eq!(Digit::from_num(10), Digit::DASH);
        assert_eq!(Digit::from_num(255), Digit::DASH);
    }
}
