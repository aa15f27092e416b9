//! Zodiac and sexagenary (干支) year naming
//!
//! Both cycles are anchored at 1900, a 庚子 (Rat) year. Offsets use
//! Euclidean remainder so years before 1900 stay on the cycle.

use crate::models::YearFact;

const ANCHOR_YEAR: i32 = 1900;

/// 庚 is the 7th heavenly stem
const ANCHOR_STEM_INDEX: i32 = 6;

pub const ZODIACS: [&str; 12] =
    ["鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪"];

/// 天干
pub const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

/// 地支
pub const EARTHLY_BRANCHES: [&str; 12] =
    ["子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥"];

fn cycle_index(year: i32, shift: i32, len: usize) -> usize {
    let offset = i64::from(year) - i64::from(ANCHOR_YEAR) + i64::from(shift);
    offset.rem_euclid(len as i64) as usize
}

pub fn zodiac(year: i32) -> &'static str {
    ZODIACS[cycle_index(year, 0, ZODIACS.len())]
}

/// e.g. 2024 -> "甲辰年"
pub fn sexagenary_name(year: i32) -> String {
    let stem = HEAVENLY_STEMS[cycle_index(year, ANCHOR_STEM_INDEX, HEAVENLY_STEMS.len())];
    let branch = EARTHLY_BRANCHES[cycle_index(year, 0, EARTHLY_BRANCHES.len())];
    format!("{}{}年", stem, branch)
}

pub fn year_fact(year: i32) -> YearFact {
    YearFact { year, lunar_year_name: sexagenary_name(year), zodiac: zodiac(year).to_string() }
}
