use std::sync::atomic::{AtomicU32, Ordering};

fn main() {
    golandspec::run("closure api", |ctx| {
        // =================================================================
        // Basic describe / context / it
        // =================================================================
        ctx.describe("Calculator", |ctx| {
            ctx.it("adds two numbers", || {
                let (a, b) = (2, 3);
                assert_eq!(a + b, 5);
            });

            ctx.it("multiplies", || {
                let (a, b) = (3, 4);
                assert_eq!(a * b, 12);
            });

            ctx.context("with negative numbers", |ctx| {
                ctx.it("handles negatives", || {
                    let (a, b) = (-1, 3);
                    assert_eq!(a + b, 2);
                });
            });

            ctx.when("dividing", |ctx| {
                ctx.it("divides evenly", || {
                    let (a, b) = (10, 2);
                    assert_eq!(a / b, 5);
                });

                ctx.xit("handles division by zero", || {});
            });
        });

        // =================================================================
        // Hooks
        // =================================================================
        ctx.describe("Hooks", |ctx| {
            static SUITE_COUNTER: AtomicU32 = AtomicU32::new(0);
            static BE_COUNTER: AtomicU32 = AtomicU32::new(0);
            static AE_COUNTER: AtomicU32 = AtomicU32::new(0);

            ctx.before_suite(|| {
                SUITE_COUNTER.fetch_add(1, Ordering::SeqCst);
            });

            ctx.before_each(|| {
                BE_COUNTER.fetch_add(1, Ordering::SeqCst);
            });

            ctx.after_each(|| {
                AE_COUNTER.fetch_add(1, Ordering::SeqCst);
            });

            ctx.it("runs before_suite once", || {
                assert_eq!(SUITE_COUNTER.load(Ordering::SeqCst), 1);
            });

            ctx.it("runs before_each before every test", || {
                assert_eq!(BE_COUNTER.load(Ordering::SeqCst), 2);
            });

            ctx.it("runs after_each after every test", || {
                assert_eq!(AE_COUNTER.load(Ordering::SeqCst), 2);
            });

            ctx.after_suite(|| {
                assert_eq!(BE_COUNTER.load(Ordering::SeqCst), 3);
            });
        });

        // =================================================================
        // Runtime skip
        // =================================================================
        ctx.describe("Skip", |ctx| {
            ctx.it("skips at runtime", || {
                golandspec::skip("not supported here");
            });
        });
    });
}
