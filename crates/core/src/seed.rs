//! Built-in starter programme.
//!
//! A four-day split with one anchor lift per day, used to populate an
//! empty installation via `POST /api/v1/templates/seed`.

/// One exercise line in a starter template.
#[derive(Debug, Clone, Copy)]
pub struct SeedExercise {
    pub name: &'static str,
    pub sets: i32,
    pub repetitions: i32,
    pub weight: &'static str,
    /// Rest between sets, in seconds.
    pub rest: i32,
}

/// One starter workout template.
#[derive(Debug, Clone, Copy)]
pub struct SeedTemplate {
    pub workout_day: i32,
    pub workout_name: &'static str,
    pub exercises: &'static [SeedExercise],
}

pub const STARTER_PROGRAMME: &[SeedTemplate] = &[
    SeedTemplate {
        workout_day: 1,
        workout_name: "Posterior chain - Lower body",
        exercises: &[SeedExercise {
            name: "Deadlift",
            sets: 4,
            repetitions: 10,
            weight: "21kg",
            rest: 60,
        }],
    },
    SeedTemplate {
        workout_day: 2,
        workout_name: "Push - Upper body",
        exercises: &[SeedExercise {
            name: "Flat bench press",
            sets: 4,
            repetitions: 8,
            weight: "20kg",
            rest: 60,
        }],
    },
    SeedTemplate {
        workout_day: 3,
        workout_name: "Anterior chain - Lower body",
        exercises: &[SeedExercise {
            name: "45 degree leg press",
            sets: 4,
            repetitions: 10,
            weight: "40kg",
            rest: 60,
        }],
    },
    SeedTemplate {
        workout_day: 4,
        workout_name: "Pull - Upper body",
        exercises: &[SeedExercise {
            name: "Lat pulldown",
            sets: 4,
            repetitions: 12,
            weight: "5 plates",
            rest: 60,
        }],
    },
];
