#![cfg(test)]

use super::*;
use crate::error::ValueMissing;
use crate::util::lifecycle::LiveCounter;
use crate::util::panic::assert_panics;

#[test]
fn test_sum_type_drops_exactly_once() {
    let live = LiveCounter::tracker();

    {
        let mut cell = SumType2::<LiveCounter, LiveCounter>::make::<0>(LiveCounter::new(&live, 0));
        assert_eq!(live.get(), 1);

        cell.emplace::<1>(LiveCounter::new(&live, 1));
        assert_eq!(live.get(), 1, "Emplacing should drop the previous value.");
        assert_eq!(cell.index(), Some(1));
        assert_eq!(cell.value::<1>().id, 1);

        let taken = cell.take();
        assert!(cell.is_empty(), "Taking should leave the cell empty.");
        assert_eq!(live.get(), 1, "Taking should move the value, not copy it.");
        drop(taken);
        assert_eq!(live.get(), 0);

        cell.emplace::<0>(LiveCounter::new(&live, 2));
        cell.reset();
        assert_eq!(live.get(), 0, "Resetting should drop the value.");

        cell.emplace::<1>(LiveCounter::new(&live, 3));
    }

    assert_eq!(live.get(), 0, "Dropping the cell should drop its value.");
}

#[test]
fn test_sum_type_access() {
    let mut cell = SumType3::<u8, u16, u32>::make::<2>(7);

    assert_eq!(cell.index(), Some(2));
    assert_eq!(cell.get::<0>(), None);
    assert_eq!(cell.get::<1>(), None);
    assert_eq!(cell.get::<2>(), Some(&7));

    *cell.value_mut::<2>() += 1;
    assert_eq!(*cell.value::<2>(), 8);

    assert_eq!(cell.take_value::<1>(), None);
    assert_eq!(cell.index(), Some(2), "A failed take shouldn't change the cell.");
    assert_eq!(cell.take_value::<2>(), Some(8));
    assert_eq!(cell.index(), None);
}

#[test]
fn test_sum_type_wrong_variant() {
    let cell = SumType3::<u8, u16, u32>::make::<2>(7);
    assert_panics!({
        let _ = cell.value::<0>();
    });

    let empty = SumType4::<u8, u16, u32, u64>::default();
    assert!(empty.is_empty());
    assert_panics!({
        let _ = empty.value::<3>();
    });
}

#[test]
fn test_sum_type_swap() {
    let mut a = SumType2::<u8, &str>::make::<0>(1);
    let mut b = SumType2::<u8, &str>::make::<1>("one");

    a.swap(&mut b);
    assert_eq!(a.get::<1>(), Some(&"one"));
    assert_eq!(b.get::<0>(), Some(&1));

    let mut empty = SumType2::new();
    a.swap(&mut empty);
    assert!(a.is_empty());
    assert_eq!(empty.index(), Some(1));
}

#[test]
fn test_optional_lifecycle() {
    let live = LiveCounter::tracker();

    {
        let mut a = make_optional(LiveCounter::new(&live, 5));
        let b = a.clone();
        assert_eq!(live.get(), 2, "Cloning should copy the value.");
        assert_eq!(a, b);

        let c = a.take();
        assert!(!a.has_value(), "Taking should leave the source empty.");
        assert_eq!(c.value().id, 5);
        assert_eq!(live.get(), 2);

        a.emplace(LiveCounter::new(&live, 6));
        let previous = a.replace(LiveCounter::new(&live, 7));
        assert_eq!(previous.into_value().id, 6);
        assert_eq!(live.get(), 3);
        assert_eq!(a.value().id, 7);

        a.reset();
        assert_eq!(live.get(), 2);
    }

    assert_eq!(live.get(), 0, "Each value should be dropped exactly once.");
}

#[test]
fn test_optional_empty() {
    let mut empty = Optional::<u32>::none();

    assert!(!empty.has_value());
    assert_eq!(empty.as_ref(), None);
    assert_eq!(empty.take(), Optional::default());
    assert_eq!(empty.value_or(4), 4);

    assert_panics!({
        let _ = empty.value();
    });
    assert_panics!({
        let _ = empty.into_value();
    });
}

#[test]
fn test_optional_conversions() {
    let three: Optional<u8> = Some(3).into();
    assert_eq!(three.map(|n| n * 2).into_option(), Some(6));
    assert_eq!(three.cast::<u32>(), make_optional(3_u32));
    assert_eq!(Option::<u8>::from(Optional::none()), None);

    assert_eq!(format!("{three:?}"), "Optional(3)");
    assert_eq!(format!("{:?}", Optional::<u8>::none()), "Optional(-)");
}

#[test]
fn test_either_access() {
    let mut left: Either<u8, &str> = Left(1).into();
    let right: Either<u8, &str> = Right("one").into();

    assert!(left.is_left() && !left.is_right());
    assert!(right.is_right() && !right.is_left());

    *left.left_mut() += 1;
    assert_eq!(*left.left(), 2);
    assert_eq!(left.right_ref(), None);
    assert_eq!(*right.right(), "one");
    assert_eq!(right.left_ref(), None);

    assert_eq!(left.into_std(), Ok(2));
    assert_eq!(right.into_std(), Err("one"));

    assert_panics!({
        let _ = left.right();
    });
    assert_panics!({
        let _ = right.into_left();
    });
}

#[test]
fn test_either_transform() {
    let left = make_left::<u8, &str>(4);

    assert_eq!(left.map_left(|n| n + 1), make_left(5));
    assert_eq!(left.map_right(str::len), make_left(4));
    assert_eq!(left.flip(), make_right(4));
    assert_eq!(left.cast::<u64, String>(), make_left(4_u64));

    assert_eq!(format!("{left:?}"), "Left(4)");
    assert_eq!(format!("{:?}", left.flip()), "Right(4)");
}

#[test]
fn test_either_drops_exactly_once() {
    let live = LiveCounter::tracker();

    {
        let either = make_right::<u8, _>(LiveCounter::new(&live, 0));
        let flipped = either.flip();
        assert_eq!(live.get(), 1);
        assert_eq!(flipped.into_left().id, 0);
        assert_eq!(live.get(), 0);

        let _kept = make_left::<_, u8>(LiveCounter::new(&live, 1));
        assert_eq!(live.get(), 1);
    }

    assert_eq!(live.get(), 0);
}

#[test]
fn test_result() {
    let good: Result<u8, &str> = ok(3);
    let bad: Result<u8, &str> = Error("broken").into();

    assert!(good.has_value() && !good.is_error());
    assert!(bad.is_error() && !bad.has_value());
    assert_eq!(*good.value(), 3);
    assert_eq!(*bad.error(), "broken");
    assert_eq!(good.error_ref(), None);
    assert_eq!(bad.value_ref(), None);

    assert_eq!(good.map(u32::from).into_value(), 3_u32);
    assert_eq!(bad.map_error(str::len).into_error(), 6);
    assert_eq!(bad, err("broken"));

    assert_panics!({
        let _ = good.error();
    });
    assert_panics!({
        let _ = bad.into_value();
    });

    assert_eq!(format!("{good:?}"), "Ok(3)");
    assert_eq!(format!("{bad:?}"), "Error(\"broken\")");
}

#[test]
fn test_result_interop() {
    fn parse(input: &str) -> core::result::Result<u32, std::num::ParseIntError> {
        let parsed: Result<u32, _> = input.parse::<u32>().into();
        let value = parsed.into_std()?;
        Ok(value * 2)
    }

    assert_eq!(parse("21"), Ok(42));
    assert!(parse("x").is_err());

    let missing: Result<u8, ValueMissing> = err(ValueMissing);
    assert_panics!({
        missing.throw();
    });
    assert_eq!(ok::<u8, ValueMissing>(1).throw(), 1);
}

crate::tagged_union! {
    #[derive(Debug, Clone, PartialEq)]
    enum Token: TokenKind {
        Number(i64),
        Word(String),
        End,
    }
}

#[test]
fn test_tagged_union() {
    let tokens = [Token::Word("sum".into()), Token::Number(4), Token::End];

    let kinds: [TokenKind; 3] = [tokens[0].tag(), tokens[1].tag(), tokens[2].tag()];
    assert_eq!(kinds, [TokenKind::Word, TokenKind::Number, TokenKind::End]);
    assert_eq!(tokens[1].index(), 0);
    assert_eq!(tokens[2].index(), 2);
    assert!(tokens[0].is_word() && !tokens[0].is_end());

    assert_eq!(Token::TAGS, TokenKind::ALL);
    assert_eq!(TokenKind::Word.name(), "Word");
    assert_eq!(TokenKind::End.to_string(), "End");
    assert_eq!(TokenKind::from_index(1), Some(TokenKind::Word));
    assert_eq!(TokenKind::from_index(3), None);

    let described = tokens.each_ref().map(|token| match token {
        Token::Number(n) => format!("number {n}"),
        Token::Word(word) => format!("word {word}"),
        Token::End => "end".to_string(),
    });
    assert_eq!(described, ["word sum", "number 4", "end"]);
}
