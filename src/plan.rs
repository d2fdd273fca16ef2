//! The weekly training plan served to the page.

use chrono::Weekday;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MainSet {
    pub name: &'static str,
    pub reps: u32,
    /// Rest between reps in seconds; zero means no rest timer.
    pub rest: u32,
    pub speed: f64,
}

#[derive(Debug, Serialize)]
pub struct Mobility {
    pub name: &'static str,
    pub duration: u32,
}

#[derive(Debug, Serialize)]
pub struct DayPlan {
    pub day: &'static str,
    pub kind: &'static str,
    pub explain: &'static str,
    pub warmup: &'static [&'static str],
    pub main: &'static [MainSet],
    pub mobility: &'static [Mobility],
}

pub static WEEK: &[DayPlan] = &[
    DayPlan {
        day: "Monday",
        kind: "Intervals",
        explain: "Short, hard efforts at race pace with minimal recovery. Focus on relaxed speed and consistent splits.",
        warmup: &["Easy Jog - 10 min", "Dynamic stretches - 5 min"],
        main: &[MainSet { name: "400 m @ 2 km pace", reps: 6, rest: 15, speed: 14.7 }],
        mobility: &[Mobility { name: "Hip Flexor Stretch", duration: 60 }],
    },
    DayPlan {
        day: "Tuesday",
        kind: "Tempo",
        explain: "Comfortably hard sustained running to improve lactate threshold.",
        warmup: &["Easy Jog - 10 min"],
        main: &[
            MainSet { name: "Tempo run", reps: 1, rest: 0, speed: 13.8 },
            MainSet { name: "100 m strides", reps: 3, rest: 60, speed: 16.0 },
        ],
        mobility: &[Mobility { name: "Hamstring Stretch", duration: 60 }],
    },
    DayPlan {
        day: "Wednesday",
        kind: "Recovery",
        explain: "Easy aerobic running to aid recovery and maintain efficiency.",
        warmup: &["Brisk walk - 5 min"],
        main: &[MainSet { name: "Easy run - 20 min", reps: 1, rest: 0, speed: 11.5 }],
        mobility: &[Mobility { name: "Full-body stretch", duration: 900 }],
    },
    DayPlan {
        day: "Thursday",
        kind: "VO2 Max",
        explain: "Longer intervals slightly faster than race pace to improve oxygen uptake.",
        warmup: &["Easy Jog - 10 min"],
        main: &[MainSet { name: "500 m fast intervals", reps: 5, rest: 120, speed: 15.0 }],
        mobility: &[Mobility { name: "Quad Stretch", duration: 60 }],
    },
    DayPlan {
        day: "Friday",
        kind: "Endurance + Strides",
        explain: "Aerobic base work followed by fast but relaxed strides.",
        warmup: &["Easy Jog - 5-10 min"],
        main: &[
            MainSet { name: "Long easy run", reps: 1, rest: 0, speed: 11.0 },
            MainSet { name: "Strides", reps: 4, rest: 90, speed: 16.5 },
        ],
        mobility: &[Mobility { name: "Foam roll", duration: 600 }],
    },
    DayPlan {
        day: "Saturday",
        kind: "Race Simulation",
        explain: "Broken race effort to rehearse pacing and fatigue control.",
        warmup: &["Easy Jog - 10 min"],
        main: &[
            MainSet { name: "1 km steady", reps: 1, rest: 120, speed: 14.0 },
            MainSet { name: "500 m goal pace", reps: 1, rest: 120, speed: 14.7 },
            MainSet { name: "400 m fast", reps: 2, rest: 120, speed: 15.2 },
        ],
        mobility: &[Mobility { name: "Hip Flexor Stretch", duration: 60 }],
    },
];

pub fn day_names() -> Vec<&'static str> {
    WEEK.iter().map(|plan| plan.day).collect()
}

pub fn find_day(name: &str) -> Option<&'static DayPlan> {
    WEEK.iter().find(|plan| plan.day.eq_ignore_ascii_case(name))
}

/// Plan for a weekday; days without a session fall back to the first plan day.
pub fn for_weekday(weekday: Weekday) -> &'static DayPlan {
    let name = match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    find_day(name).unwrap_or(&WEEK[0])
}
