// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use time::{Date, Duration, Month, Weekday};

use crate::{Appointment, WeekStart};

pub const GRID_WEEKS: usize = 6;
pub const GRID_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: Date,
    pub in_month: bool,
    pub today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month: Month,
    week_start: WeekStart,
    weeks: [[DayCell; GRID_DAYS]; GRID_WEEKS],
}

impl MonthGrid {
    pub fn new(year: i32, month: Month, week_start: WeekStart, today: Date) -> Option<Self> {
        let first = Date::from_calendar_date(year, month, 1).ok()?;
        let lead = days_since_week_start(first.weekday(), week_start);
        let origin = first.checked_sub(Duration::days(i64::from(lead)))?;

        let blank = DayCell {
            date: origin,
            in_month: false,
            today: false,
        };
        let mut weeks = [[blank; GRID_DAYS]; GRID_WEEKS];
        for (week_index, week) in weeks.iter_mut().enumerate() {
            for (day_index, cell) in week.iter_mut().enumerate() {
                let offset = (week_index * GRID_DAYS + day_index) as i64;
                let date = origin.checked_add(Duration::days(offset))?;
                *cell = DayCell {
                    date,
                    in_month: date.month() == month && date.year() == year,
                    today: date == today,
                };
            }
        }

        Some(Self {
            year,
            month,
            week_start,
            weeks,
        })
    }

    pub fn containing(date: Date, week_start: WeekStart, today: Date) -> Option<Self> {
        Self::new(date.year(), date.month(), week_start, today)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn weeks(&self) -> &[[DayCell; GRID_DAYS]; GRID_WEEKS] {
        &self.weeks
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    pub fn weekday_labels(&self) -> [&'static str; GRID_DAYS] {
        match self.week_start {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }

    pub fn previous(&self, today: Date) -> Option<Self> {
        let (year, month) = match self.month {
            Month::January => (self.year - 1, Month::December),
            month => (self.year, month.previous()),
        };
        Self::new(year, month, self.week_start, today)
    }

    pub fn next(&self, today: Date) -> Option<Self> {
        let (year, month) = match self.month {
            Month::December => (self.year + 1, Month::January),
            month => (self.year, month.next()),
        };
        Self::new(year, month, self.week_start, today)
    }

    pub fn first_date(&self) -> Date {
        self.weeks[0][0].date
    }

    pub fn last_date(&self) -> Date {
        self.weeks[GRID_WEEKS - 1][GRID_DAYS - 1].date
    }
}

fn days_since_week_start(weekday: Weekday, week_start: WeekStart) -> u8 {
    match week_start {
        WeekStart::Sunday => weekday.number_days_from_sunday(),
        WeekStart::Monday => weekday.number_days_from_monday(),
    }
}

pub fn bucket_appointments<'a>(
    grid: &MonthGrid,
    appointments: &'a [Appointment],
) -> BTreeMap<Date, Vec<&'a Appointment>> {
    let first = grid.first_date();
    let last = grid.last_date();
    let mut buckets: BTreeMap<Date, Vec<&Appointment>> = BTreeMap::new();
    for appointment in appointments
        .iter()
        .filter(|appointment| appointment.date >= first && appointment.date <= last)
    {
        buckets.entry(appointment.date).or_default().push(appointment);
    }
    for day in buckets.values_mut() {
        day.sort_by_key(|appointment| appointment.start);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::{GRID_DAYS, GRID_WEEKS, MonthGrid, bucket_appointments};
    use crate::{Appointment, AppointmentId, AppointmentKind, WeekStart};
    use time::macros::{date, time};
    use time::{Month, Time, Weekday};

    fn appointment(id: &str, date: time::Date, start: Time) -> Appointment {
        Appointment {
            id: AppointmentId::from(id),
            title: format!("meeting {id}"),
            client_name: "Aaron".to_owned(),
            date,
            start,
            duration_minutes: 30,
            kind: AppointmentKind::Call,
        }
    }

    #[test]
    fn sunday_grid_starts_on_or_before_the_first() {
        // 2026-10-01 is a Thursday.
        let grid = MonthGrid::new(2026, Month::October, WeekStart::Sunday, date!(2026 - 10 - 19))
            .expect("grid");
        assert_eq!(grid.first_date(), date!(2026 - 09 - 27));
        assert_eq!(grid.first_date().weekday(), Weekday::Sunday);
        assert_eq!(grid.last_date(), date!(2026 - 11 - 07));
        assert_eq!(grid.title(), "October 2026");
    }

    #[test]
    fn monday_grid_shifts_columns() {
        let grid = MonthGrid::new(2026, Month::October, WeekStart::Monday, date!(2026 - 10 - 19))
            .expect("grid");
        assert_eq!(grid.first_date(), date!(2026 - 09 - 28));
        assert_eq!(grid.weekday_labels()[0], "Mon");
        assert_eq!(grid.weekday_labels()[6], "Sun");
    }

    #[test]
    fn month_starting_on_week_start_has_no_lead_days() {
        // 2026-02-01 is a Sunday.
        let grid = MonthGrid::new(2026, Month::February, WeekStart::Sunday, date!(2026 - 02 - 10))
            .expect("grid");
        assert_eq!(grid.first_date(), date!(2026 - 02 - 01));
        assert!(grid.weeks()[0][0].in_month);
    }

    #[test]
    fn grid_is_six_by_seven_with_flags() {
        let today = date!(2026 - 10 - 19);
        let grid = MonthGrid::containing(today, WeekStart::Sunday, today).expect("grid");
        let cells = grid.weeks().iter().flatten().collect::<Vec<_>>();
        assert_eq!(cells.len(), GRID_WEEKS * GRID_DAYS);
        assert_eq!(cells.iter().filter(|cell| cell.in_month).count(), 31);
        let todays = cells.iter().filter(|cell| cell.today).collect::<Vec<_>>();
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].date, today);
        for pair in cells.windows(2) {
            assert_eq!(pair[0].date.next_day(), Some(pair[1].date));
        }
    }

    #[test]
    fn navigation_rolls_over_years() {
        let today = date!(2026 - 10 - 19);
        let december = MonthGrid::new(2026, Month::December, WeekStart::Sunday, today)
            .expect("grid");
        let january = december.next(today).expect("next");
        assert_eq!((january.year(), january.month()), (2027, Month::January));
        let back = january.previous(today).expect("previous");
        assert_eq!((back.year(), back.month()), (2026, Month::December));
        assert_eq!(back.week_start(), WeekStart::Sunday);
    }

    #[test]
    fn appointments_bucket_by_day_sorted_by_start() {
        let today = date!(2026 - 10 - 19);
        let grid = MonthGrid::containing(today, WeekStart::Sunday, today).expect("grid");
        let appointments = vec![
            appointment("A1", date!(2026 - 10 - 20), time!(14:00)),
            appointment("A2", date!(2026 - 10 - 20), time!(09:30)),
            appointment("A3", date!(2026 - 09 - 27), time!(08:00)),
            appointment("A4", date!(2026 - 12 - 01), time!(08:00)),
        ];

        let buckets = bucket_appointments(&grid, &appointments);
        let day = buckets.get(&date!(2026 - 10 - 20)).expect("bucket");
        let ids = day.iter().map(|a| a.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["A2", "A1"]);
        assert!(buckets.contains_key(&date!(2026 - 09 - 27)));
        assert!(!buckets.contains_key(&date!(2026 - 12 - 01)));
    }
}
