//! Flavor text for the dashboard and reminders. Uniform picks from fixed lists.

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

const COACH_MESSAGES: [&str; 13] = [
    "C'mon, only {remaining} more reels to go today! You got this!",
    "Sleep is for people who don't grind reels! Only {remaining} left!",
    "{remaining} more reels? That's nothing for a champion like you!",
    "Your feed misses you. It's been whole minutes! {remaining} awaiting!",
    "Real legends watch reels until their battery dies. {remaining} more!",
    "You're not addicted, you just appreciate short-form content! {remaining} left!",
    "Those {remaining} reels won't watch themselves!",
    "Your productivity can wait. These {remaining} reels can't!",
    "Thumb getting tired? The algorithm demands sacrifice! {remaining} left!",
    "Time enjoyed wasting isn't wasted time... right? {remaining} more!",
    "Each reel brings you closer to digital enlightenment! {remaining} away!",
    "Your brain cells are waiting for their next {remaining} hits.",
    "Professional procrastinator achievement unlocked! {remaining} more to go!",
];

/// Rotating chat-bubble lines; these carry no placeholders.
const COACH_CHAT_MESSAGES: [&str; 12] = [
    "Nissaram, ini 1200 reels und. Easy aanu 😎",
    "Daivame, ithrayum reels kazhinjittu randu koode kaanamo? Kaanam 🔥",
    "Ullil superstar und. Appo enthina fear? Swipe cheyy! 🎬",
    "Ini onchirikanam. Algorithm kaananam njangal arannu! 🧠",
    "Nee cool aanu. Pakshe reels kaanathe aa cool maintain cheyyan patilla 😤",
    "Ithu kaanathe urangano? Nee aara 😒",
    "Chetan ready aano? Algorithm already wait cheyyunnu 😈",
    "Thumb workout miss cheyyaruthu innu 💪📱",
    "Daivam kandittu daivam aaki. Ippo reels kaananam 😌",
    "Innathe quota full complete cheyyanam. Allenkil streak poykotte 😢",
    "Swipe cheyy, productivity enna vishayam shesham nokkam 😏",
    "Just 3 more reels, promise. Athu kazhinjal mathram kazhinjilla 😂",
];

const REMINDER_TITLES: [&str; 8] = [
    "Time for your reel fix!",
    "Your feed misses you!",
    "Reel break time!",
    "Daily dopamine dose ready!",
    "Algorithm is waiting...",
    "Scroll o'clock!",
    "Show time!",
    "Your stories await!",
];

const REMINDER_MESSAGES: [&str; 10] = [
    "Don't break your streak! Come back and watch some reels",
    "Your daily goal awaits. Time to get scrolling!",
    "The algorithm has fresh content just for you!",
    "Quick reel break? You know you want to...",
    "Your thumb is getting weak! Time for some exercise",
    "Warning: Productivity detected. Please resume scrolling immediately!",
    "Your ancestors didn't fight for survival so you could be productive. Watch reels!",
    "Breaking news: New reels available! Your attention required",
    "Reel withdrawal symptoms detected. Immediate scrolling recommended!",
    "Life's too short to not watch reels. Come back!",
];

const MILESTONE_STEP: u64 = 100;
const GOAL_STRETCH: u32 = 50;

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

pub fn coach_message<R: Rng + ?Sized>(remaining: u64, rng: &mut R) -> String {
    pick(&COACH_MESSAGES, rng).replace("{remaining}", &remaining.to_string())
}

pub fn coach_chat_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(&COACH_CHAT_MESSAGES, rng)
}

pub fn goal_reached_message(goal: u32) -> String {
    format!(
        "You've hit your goal of {goal} reels! Why stop now? Let's go for {}!",
        goal.saturating_add(GOAL_STRETCH)
    )
}

pub fn reminder_title<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(&REMINDER_TITLES, rng)
}

pub fn reminder_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(&REMINDER_MESSAGES, rng)
}

/// True when `current` reached a multiple of 100 that `previous` had not.
pub fn milestone_crossed(previous: u64, current: u64) -> bool {
    current / MILESTONE_STEP > previous / MILESTONE_STEP
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStage {
    Start,
    Early,
    KeepGoing,
    AlmostThere,
    FinalStretch,
    Celebration,
}

impl ProgressStage {
    pub fn for_progress(current: u64, goal: u32) -> Self {
        if current == 0 {
            return ProgressStage::Start;
        }
        let progress = current as f64 / f64::from(goal.max(1));
        if progress < 0.25 {
            ProgressStage::Early
        } else if progress < 0.5 {
            ProgressStage::KeepGoing
        } else if progress < 0.8 {
            ProgressStage::AlmostThere
        } else if progress >= 1.0 {
            ProgressStage::Celebration
        } else {
            ProgressStage::FinalStretch
        }
    }
}
