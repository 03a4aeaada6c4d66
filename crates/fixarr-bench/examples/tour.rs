//! Walk through the array API end to end.
//!
//! Run with `RUST_LOG=fixarr=debug` to watch block reuse and reallocation.

use fixarr::{Arr, ArrError, MultiPass, SinglePass};
use fixarr_bench::random_values;

fn main() -> Result<(), ArrError> {
    env_logger::init();
    println!("=== fixarr tour ===\n");

    let mut arr = Arr::from_list([3, 1, 4, 1, 5])?;
    println!("from_list:        {arr}");

    arr.assign_list([9, 2, 6, 5, 3])?;
    println!("same-length list: {arr}");

    arr.assign_slice(&[2, 7])?;
    println!("shorter slice:    {arr}");

    let outcome = arr.assign_range(SinglePass(10..))?;
    println!("endless source:   {arr} ({outcome:?})");

    let outcome = arr.assign_range(MultiPass((1..=6).map(|v| v * v)))?;
    println!("squares:          {arr} ({outcome:?})");

    match arr.at(10) {
        Ok(v) => println!("at(10):           {v}"),
        Err(err) => println!("at(10):           {err}"),
    }

    let mut walked = Vec::with_capacity(arr.len());
    let mut it = arr.end();
    while it != arr.begin() {
        // SAFETY: it > begin, so it - 1 lies in [begin, end).
        walked.push(unsafe { *it.dec().get() });
    }
    println!("cursor walk back: {walked:?}");

    let small: Vec<i64> = random_values(3, 42)
        .into_iter()
        .map(|v| (v % 100) as i64)
        .collect();
    let mut other = Arr::from_slice(&small)?;
    arr.swap(&mut other);
    println!("after swap:       {arr} / {other}");
    println!("ordering:         {}", arr < other);

    let empty: Arr<i64> = Arr::new();
    println!("empty:            {empty}");

    log::info!("tour finished");
    Ok(())
}
