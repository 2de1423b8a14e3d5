pub mod dump;
pub mod record;
pub mod ring;
pub mod storage;

#[cfg(test)]
mod tests {
    use crate::record::{self, Sample};
    use crate::ring::{FifoCode, RawRingBuffer, RingBuffer, RingError, Status};
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_path() -> String {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("/tmp/ringfifo_test_{}_{}.bin", std::process::id(), id)
    }

    fn samples(range: std::ops::Range<u32>) -> Vec<Sample> {
        range.map(Sample::new).collect()
    }

    mod ring_buffer {
        use super::*;

        #[test]
        fn new_creates_empty_buffer() {
            let mut storage = [0u32; 16];
            let mut ring = RingBuffer::new(&mut storage);

            assert!(ring.is_empty());
            assert!(!ring.is_full());
            assert_eq!(ring.capacity(), 16);
            assert_eq!(ring.occupied_count(), 0);
            assert_eq!(ring.available(), 16);

            let mut out = [0u32; 1];
            assert_eq!(ring.read(&mut out), Err(RingError::Empty));
        }

        #[test]
        fn write_then_read_in_order() {
            let mut storage = [Sample::default(); 16];
            let mut ring = RingBuffer::new(&mut storage);
            let input = samples(0..16);

            assert_eq!(ring.write(&input), Ok(Status::Full));
            assert_eq!(ring.occupied_count(), 16);

            let mut out = [Sample::default(); 16];
            assert_eq!(ring.read(&mut out), Ok(Status::Empty));
            assert_eq!(&out[..], &input[..]);
            assert!(ring.is_empty());
        }

        #[test]
        fn single_element_sequence() {
            let mut storage = [Sample::default(); 16];
            let mut ring = RingBuffer::new(&mut storage);
            let first = Sample::new(0xDEADBEEF);
            let second = Sample::new(7);
            let mut out = [Sample::default(); 1];

            assert_eq!(ring.write(&[first]), Ok(Status::Ok));
            assert_eq!(ring.occupied_count(), 1);
            assert_eq!(ring.read(&mut out), Ok(Status::Empty));
            assert_eq!(ring.occupied_count(), 0);
            assert_eq!(out[0], first);
            assert_eq!(ring.write(&[second]), Ok(Status::Ok));
            assert_eq!(ring.occupied_count(), 1);
            assert_eq!(ring.storage()[1], second);
        }

        #[test]
        fn occupied_count_tracks_transfers() {
            let mut storage = [0u8; 10];
            let mut ring = RingBuffer::new(&mut storage);
            let mut out = [0u8; 4];

            ring.write(&[1, 2, 3]).unwrap();
            assert_eq!(ring.occupied_count(), 3);
            ring.write(&[4, 5, 6, 7]).unwrap();
            assert_eq!(ring.occupied_count(), 7);
            ring.read(&mut out).unwrap();
            assert_eq!(ring.occupied_count(), 3);
            assert_eq!(out, [1, 2, 3, 4]);
        }

        #[test]
        fn oversized_requests_move_nothing() {
            let mut storage = [0xFFu8; 8];
            let mut ring = RingBuffer::new(&mut storage);

            assert_eq!(
                ring.write(&[0; 9]),
                Err(RingError::InsufficientSpace {
                    requested: 9,
                    available: 8
                })
            );
            assert!(ring.is_empty());
            assert_eq!(ring.storage(), &[0xFF; 8]);

            ring.write(&[1, 2, 3]).unwrap();
            let mut out = [0xAAu8; 4];
            assert_eq!(
                ring.read(&mut out),
                Err(RingError::InsufficientSpace {
                    requested: 4,
                    available: 3
                })
            );
            assert_eq!(out, [0xAA; 4]);
            assert_eq!(ring.occupied_count(), 3);
        }

        #[test]
        fn zero_length_is_a_no_op() {
            let mut storage = [0u16; 4];
            let mut ring = RingBuffer::new(&mut storage);
            ring.write(&[9]).unwrap();
            let (head, tail) = (ring.head(), ring.tail());

            assert_eq!(ring.write(&[]), Err(RingError::ZeroLength));
            assert_eq!(ring.read(&mut []), Err(RingError::ZeroLength));
            assert_eq!((ring.head(), ring.tail()), (head, tail));
            assert_eq!(ring.occupied_count(), 1);
        }

        #[test]
        fn full_is_reported_before_and_after() {
            let mut storage = [0u8; 4];
            let mut ring = RingBuffer::new(&mut storage);

            assert_eq!(ring.write(&[1, 2, 3, 4]), Ok(Status::Full));
            assert_eq!(ring.write(&[5]), Err(RingError::Full));
            assert_eq!(ring.storage(), &[1, 2, 3, 4]);
        }

        #[test]
        fn wrap_around_works() {
            const C: usize = 16;
            let mut storage = [Sample::default(); C];
            let mut ring = RingBuffer::new(&mut storage);
            let input = samples(0..(2 * C as u32 - 5));
            let mut out = [Sample::default(); C];

            assert_eq!(ring.write(&input[..C - 5]), Ok(Status::Ok));
            assert_eq!(ring.read(&mut out[..C - 5]), Ok(Status::Empty));
            assert_eq!(ring.write(&input[C - 5..]), Ok(Status::Full));

            // slots 0..C-5 hold the wrapped tail of the second batch
            let mut reference = [Sample::default(); C];
            reference[..C - 5].copy_from_slice(&input[C..]);
            reference[C - 5..].copy_from_slice(&input[C - 5..C]);
            assert_eq!(ring.storage(), &reference[..]);

            assert_eq!(ring.read(&mut out), Ok(Status::Empty));
            assert_eq!(&out[..], &input[C - 5..]);
        }

        #[test]
        fn clear_keeps_storage() {
            let mut storage = [0u8; 4];
            let mut ring = RingBuffer::new(&mut storage);
            ring.write(&[7, 8]).unwrap();
            ring.clear();

            assert!(ring.is_empty());
            assert_eq!((ring.head(), ring.tail()), (0, 0));
            assert_eq!(ring.into_storage(), &[7, 8, 0, 0]);
        }
    }

    mod raw_ring_buffer {
        use super::*;
        use crate::ring::LayoutError;

        #[test]
        fn layout_is_checked() {
            let mut storage = [0u8; 32];
            assert_eq!(
                RawRingBuffer::new(&mut storage, 4, 0).unwrap_err(),
                LayoutError::ZeroElementSize
            );
            assert_eq!(
                RawRingBuffer::new(&mut storage, 5, 8).unwrap_err(),
                LayoutError::StorageTooSmall {
                    required: 40,
                    provided: 32
                }
            );
            assert!(matches!(
                RawRingBuffer::new(&mut storage, usize::MAX, 2),
                Err(LayoutError::Overflow { .. })
            ));
        }

        #[test]
        fn from_storage_uses_whole_elements() {
            let mut storage = [0u8; 35];
            let ring = RawRingBuffer::from_storage(&mut storage, Sample::SIZE).unwrap();
            assert_eq!(ring.capacity(), 3);
            assert_eq!(ring.element_size(), Sample::SIZE);
        }

        #[test]
        fn round_trip_records() {
            let mut storage = [0xFFu8; 16 * Sample::SIZE];
            let mut ring = RawRingBuffer::new(&mut storage, 16, Sample::SIZE).unwrap();
            let input = samples(0..16);
            let mut bytes = [0u8; 16 * Sample::SIZE];
            record::encode_into(&input, &mut bytes).unwrap();

            assert_eq!(ring.write(&bytes, 16), Ok(Status::Full));

            let mut back = [0u8; 16 * Sample::SIZE];
            assert_eq!(ring.read(&mut back, 16), Ok(Status::Empty));
            assert_eq!(back, bytes);

            let mut decoded = [Sample::default(); 16];
            assert_eq!(record::decode_from(&back, &mut decoded), 16);
            assert_eq!(&decoded[..], &input[..]);
        }

        #[test]
        fn short_caller_buffer_is_refused() {
            let mut storage = [0u8; 16];
            let mut ring = RawRingBuffer::new(&mut storage, 4, 4).unwrap();

            assert_eq!(
                ring.write(&[1; 7], 2),
                Err(RingError::ShortBuffer {
                    required: 8,
                    provided: 7
                })
            );
            assert!(ring.is_empty());

            ring.write(&[1; 8], 2).unwrap();
            let mut out = [0u8; 4];
            assert_eq!(
                ring.read(&mut out, 2),
                Err(RingError::ShortBuffer {
                    required: 8,
                    provided: 4
                })
            );
            assert_eq!(ring.occupied_count(), 2);
        }

        #[test]
        fn extra_caller_bytes_are_ignored() {
            let mut storage = [0u8; 8];
            let mut ring = RawRingBuffer::new(&mut storage, 4, 2).unwrap();

            ring.write(&[1, 2, 3, 4, 5, 6], 1).unwrap();
            let mut out = [0xAAu8; 4];
            assert_eq!(ring.read(&mut out, 1), Ok(Status::Empty));
            assert_eq!(out, [1, 2, 0xAA, 0xAA]);
        }

        #[test]
        fn bytes_past_capacity_are_never_touched() {
            let mut storage = [0xFFu8; 12];
            let mut ring = RawRingBuffer::new(&mut storage, 2, 4).unwrap();
            ring.write(&[0; 8], 2).unwrap();
            assert_eq!(&ring.storage()[8..], &[0xFF; 4]);
        }
    }

    mod fifo_code {
        use super::*;

        #[test]
        fn codes_match_flat_values() {
            assert_eq!(u8::from(FifoCode::Ok), 0);
            assert_eq!(u8::from(FifoCode::Empty), 1);
            assert_eq!(u8::from(FifoCode::Full), 2);
            assert_eq!(u8::from(FifoCode::ZeroSize), 3);
            assert_eq!(u8::from(FifoCode::NotEnoughSpace), 4);
        }

        #[test]
        fn full_collapses_both_meanings() {
            let mut storage = [0u8; 2];
            let mut ring = RingBuffer::new(&mut storage);

            let filled = ring.write(&[1, 2]);
            let refused = ring.write(&[3]);
            assert_eq!(filled, Ok(Status::Full));
            assert_eq!(refused, Err(RingError::Full));
            assert_eq!(FifoCode::from_result(&filled), FifoCode::Full);
            assert_eq!(FifoCode::from_result(&refused), FifoCode::Full);
        }

        #[test]
        fn error_codes() {
            assert_eq!(FifoCode::from(RingError::ZeroLength), FifoCode::ZeroSize);
            assert_eq!(
                FifoCode::from(RingError::InsufficientSpace {
                    requested: 2,
                    available: 1
                }),
                FifoCode::NotEnoughSpace
            );
            assert_eq!(
                FifoCode::from(RingError::ShortBuffer {
                    required: 2,
                    provided: 1
                }),
                FifoCode::NotEnoughSpace
            );
            assert_eq!(FifoCode::from(Status::Ok), FifoCode::Ok);
        }

        #[test]
        fn error_messages() {
            let err = RingError::InsufficientSpace {
                requested: 5,
                available: 2,
            };
            assert_eq!(
                err.to_string(),
                "Not enough space in ring buffer: requested 5 elements, available 2 elements"
            );
        }
    }

    mod record_codec {
        use super::*;

        #[test]
        fn size_matches_encoding() {
            assert_eq!(Sample::new(1).to_bytes().len(), Sample::SIZE);
        }

        #[test]
        fn fields_are_little_endian() {
            let bytes = Sample::new(0xDEADBEEF).to_bytes();
            assert_eq!(bytes[0], 0xEC);
            assert_eq!(&bytes[1..5], &[0xEF, 0xBE, 0xAD, 0xDE]);
            assert_eq!(&bytes[5..9], &0.1234f32.to_le_bytes());
            assert_eq!(bytes[9], 0xCE);
            assert!(Sample::from_bytes(&bytes).is_marked());
        }

        #[test]
        fn encode_into_short_buffer_fails() {
            let mut out = [0u8; Sample::SIZE];
            assert_eq!(record::encode_into(&samples(0..2), &mut out), None);
            assert_eq!(record::encode_into(&samples(0..1), &mut out), Some(Sample::SIZE));
        }

        #[test]
        fn decode_stops_at_shorter_side() {
            let mut bytes = [0u8; 3 * Sample::SIZE + 4];
            record::encode_into(&samples(0..3), &mut bytes).unwrap();
            let mut out = [Sample::default(); 5];
            assert_eq!(record::decode_from(&bytes, &mut out), 3);
            assert_eq!(out[2].word, 2);
        }
    }

    mod mmap_storage {
        use super::*;
        use crate::storage::MmapRegion;
        use std::fs;

        #[test]
        fn anonymous_region_backs_a_ring() {
            let mut region = MmapRegion::anonymous(8 * Sample::SIZE).unwrap();
            assert_eq!(region.len(), 8 * Sample::SIZE);
            region.fill(0xFF);

            let mut ring = RawRingBuffer::new(region.as_mut_slice(), 8, Sample::SIZE).unwrap();
            let one = Sample::new(42).to_bytes();
            assert_eq!(ring.write(&one, 1), Ok(Status::Ok));

            let mut out = [0u8; Sample::SIZE];
            assert_eq!(ring.read(&mut out, 1), Ok(Status::Empty));
            assert_eq!(Sample::from_bytes(&out).word, 42);
            assert_eq!(&region.as_slice()[..Sample::SIZE], &one);
        }

        #[test]
        fn zero_length_rounds_up_to_a_page() {
            let region = MmapRegion::anonymous(0).unwrap();
            assert!(!region.is_empty());
        }

        #[test]
        fn file_region_persists_bytes() {
            let path = temp_path();

            {
                let mut region = MmapRegion::create(&path, 64).unwrap();
                let mut ring = RingBuffer::new(region.as_mut_slice());
                ring.write(b"ringfifo").unwrap();
                region.flush().unwrap();
            }

            let bytes = fs::read(&path).unwrap();
            assert_eq!(bytes.len(), 64);
            assert_eq!(&bytes[..8], b"ringfifo");

            fs::remove_file(&path).ok();
        }

        #[test]
        fn advise_sequential_succeeds() {
            let region = MmapRegion::anonymous(4096).unwrap();
            region.advise_sequential().unwrap();
        }
    }

    mod model {
        use super::*;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        use std::collections::VecDeque;

        fn seed() -> u64 {
            let seed = std::env::var("FIFO_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0x5EED_F1F0);
            println!("FIFO_SEED={}", seed);
            seed
        }

        #[test]
        fn random_batches_match_vecdeque() {
            let mut rng = StdRng::seed_from_u64(seed());

            for capacity in [1usize, 2, 3, 7, 16, 33] {
                let mut storage = vec![0u32; capacity];
                let mut ring = RingBuffer::new(&mut storage);
                let mut model: VecDeque<u32> = VecDeque::new();
                let mut next = 0u32;

                for _ in 0..2_000 {
                    let n = rng.gen_range(0..=capacity + 1);
                    if rng.gen_bool(0.5) {
                        let batch: Vec<u32> = (next..next + n as u32).collect();
                        let before = ring.occupied_count();
                        let result = ring.write(&batch);

                        if before == capacity {
                            assert_eq!(result, Err(RingError::Full));
                        } else if n == 0 {
                            assert_eq!(result, Err(RingError::ZeroLength));
                        } else if n > capacity - before {
                            assert!(matches!(result, Err(RingError::InsufficientSpace { .. })));
                        } else {
                            let expected = if before + n == capacity {
                                Status::Full
                            } else {
                                Status::Ok
                            };
                            assert_eq!(result, Ok(expected));
                            model.extend(&batch);
                            next += n as u32;
                        }
                    } else {
                        let mut out = vec![0u32; n];
                        let before = ring.occupied_count();
                        let result = ring.read(&mut out);

                        if before == 0 {
                            assert_eq!(result, Err(RingError::Empty));
                        } else if n == 0 {
                            assert_eq!(result, Err(RingError::ZeroLength));
                        } else if n > before {
                            assert!(matches!(result, Err(RingError::InsufficientSpace { .. })));
                        } else {
                            let expected = if before == n { Status::Empty } else { Status::Ok };
                            assert_eq!(result, Ok(expected));
                            let want: Vec<u32> = model.drain(..n).collect();
                            assert_eq!(out, want);
                        }
                    }

                    assert_eq!(ring.occupied_count(), model.len());
                    assert_eq!(ring.is_empty(), model.is_empty());
                    assert_eq!(ring.is_full(), model.len() == capacity);
                    assert!(ring.head() < capacity && ring.tail() < capacity);
                }
            }
        }
    }
}
