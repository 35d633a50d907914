//! Moscow time (fixed UTC+3, no DST) for displayed timestamps and for the
//! boundary of "today" in summaries and notifications.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::types::Timestamp;

/// MSK offset from UTC in hours.
pub const MSK_OFFSET_HOURS: i32 = 3;

static MSK: LazyLock<FixedOffset> = LazyLock::new(|| {
    FixedOffset::east_opt(MSK_OFFSET_HOURS * 3600).expect("UTC+3 is a valid offset")
});

/// A UTC instant as an MSK-zoned datetime.
pub fn in_msk(ts: Timestamp) -> DateTime<FixedOffset> {
    ts.with_timezone(&*MSK)
}

/// Wall-clock MSK time of a UTC instant.
pub fn to_msk(ts: Timestamp) -> NaiveDateTime {
    in_msk(ts).naive_local()
}

/// Calendar date in MSK of a UTC instant.
pub fn msk_date(ts: Timestamp) -> NaiveDate {
    in_msk(ts).date_naive()
}

/// UTC instant at which the MSK day containing `ts` began.
pub fn msk_day_start(ts: Timestamp) -> Timestamp {
    let local = in_msk(ts);
    let since_midnight = local.time() - NaiveTime::MIN;
    (local - since_midnight).with_timezone(&Utc)
}

/// `dd.mm.yyyy HH:MM` in MSK.
pub fn format_msk(ts: Timestamp) -> String {
    to_msk(ts).format("%d.%m.%Y %H:%M").to_string()
}
